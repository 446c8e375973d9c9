//! URL builders for the Kick API.
//!
//! Pure functions: each takes the site base URL and returns the full URL
//! string used both as the request target and as the cache key. Path
//! segments and query values are percent-encoded.

use serde::{Deserialize, Serialize};
use url::Url;

use kick_core::constants::{DEFAULT_LANGUAGE, DEFAULT_LIMIT, DEFAULT_PAGE};
use kick_core::error::{KickError, Result};

/// Pagination for the subcategory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubcategoryQuery {
    /// Page number, starting at 1
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl Default for SubcategoryQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Filters for the livestream listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivestreamQuery {
    /// Stream language code
    pub language: String,
    /// Sort order (`desc`, `asc`)
    pub sort: String,
    /// Page number, starting at 1
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Subcategory slug; empty for all
    pub subcategory: String,
    /// Category slug; empty for all
    pub category: String,
}

impl Default for LivestreamQuery {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            sort: "desc".to_string(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            subcategory: String::new(),
            category: String::new(),
        }
    }
}

/// Filters for the clip listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipQuery {
    /// Pagination cursor returned by the previous page
    pub cursor: u64,
    /// Sort key (`view`, `date`)
    pub sort: String,
    /// Time window (`all`, `day`, `week`, `month`)
    pub time: String,
}

impl Default for ClipQuery {
    fn default() -> Self {
        Self {
            cursor: 0,
            sort: "view".to_string(),
            time: "all".to_string(),
        }
    }
}

/// Parses and checks a base URL.
pub fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).map_err(|e| KickError::InvalidUrl(format!("{}: {}", base, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(KickError::InvalidUrl(format!(
            "{}: expected an http(s) base URL",
            base
        )));
    }
    Ok(url)
}

/// `GET /api/v1/channels/{slug}`
pub fn channel(base: &Url, slug: &str) -> Result<String> {
    if slug.trim().is_empty() {
        return Err(KickError::InvalidUrl("channel slug cannot be empty".into()));
    }
    build(base, &["api", "v1", "channels", slug.trim()], &[])
}

/// `GET /api/v1/categories`
pub fn categories(base: &Url) -> Result<String> {
    build(base, &["api", "v1", "categories"], &[])
}

/// `GET /api/v1/subcategories?page=&limit=`
pub fn subcategories(base: &Url, query: &SubcategoryQuery) -> Result<String> {
    build(
        base,
        &["api", "v1", "subcategories"],
        &[
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ],
    )
}

/// `GET /api/search?searched_word=`
pub fn search(base: &Url, searched_word: &str) -> Result<String> {
    build(
        base,
        &["api", "search"],
        &[("searched_word", searched_word.to_string())],
    )
}

/// `GET /stream/livestreams/{language}?page=&limit=&subcategory=&category=&sort=`
pub fn livestreams(base: &Url, query: &LivestreamQuery) -> Result<String> {
    build(
        base,
        &["stream", "livestreams", query.language.as_str()],
        &[
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("subcategory", query.subcategory.clone()),
            ("category", query.category.clone()),
            ("sort", query.sort.clone()),
        ],
    )
}

/// `GET /api/v2/clips?cursor=&sort=&time=`
pub fn clips(base: &Url, query: &ClipQuery) -> Result<String> {
    build(
        base,
        &["api", "v2", "clips"],
        &[
            ("cursor", query.cursor.to_string()),
            ("sort", query.sort.clone()),
            ("time", query.time.clone()),
        ],
    )
}

fn build(base: &Url, segments: &[&str], query: &[(&str, String)]) -> Result<String> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    url.path_segments_mut()
        .map_err(|_| KickError::InvalidUrl(format!("{}: cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick() -> Url {
        parse_base("https://kick.com").unwrap()
    }

    #[test]
    fn test_channel_url() {
        assert_eq!(
            channel(&kick(), "adinross").unwrap(),
            "https://kick.com/api/v1/channels/adinross"
        );
    }

    #[test]
    fn test_channel_slug_is_encoded() {
        assert_eq!(
            channel(&kick(), "a/b c").unwrap(),
            "https://kick.com/api/v1/channels/a%2Fb%20c"
        );
        assert!(channel(&kick(), "  ").is_err());
    }

    #[test]
    fn test_categories_url() {
        assert_eq!(categories(&kick()).unwrap(), "https://kick.com/api/v1/categories");
    }

    #[test]
    fn test_subcategories_defaults() {
        assert_eq!(
            subcategories(&kick(), &SubcategoryQuery::default()).unwrap(),
            "https://kick.com/api/v1/subcategories?page=1&limit=25"
        );
    }

    #[test]
    fn test_search_encodes_word() {
        assert_eq!(
            search(&kick(), "just chatting&x=1").unwrap(),
            "https://kick.com/api/search?searched_word=just+chatting%26x%3D1"
        );
    }

    #[test]
    fn test_livestreams_defaults() {
        assert_eq!(
            livestreams(&kick(), &LivestreamQuery::default()).unwrap(),
            "https://kick.com/stream/livestreams/en?page=1&limit=25&subcategory=&category=&sort=desc"
        );
    }

    #[test]
    fn test_clips_defaults() {
        assert_eq!(
            clips(&kick(), &ClipQuery::default()).unwrap(),
            "https://kick.com/api/v2/clips?cursor=0&sort=view&time=all"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let base = parse_base("http://127.0.0.1:8080/proxy/").unwrap();
        assert_eq!(
            categories(&base).unwrap(),
            "http://127.0.0.1:8080/proxy/api/v1/categories"
        );
    }

    #[test]
    fn test_parse_base_rejects_non_http() {
        assert!(parse_base("mailto:someone@kick.com").is_err());
        assert!(parse_base("ftp://kick.com").is_err());
        assert!(parse_base("not a url").is_err());
    }

    #[test]
    fn test_query_deserialize_partial() {
        let query: LivestreamQuery = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.language, "en");
    }
}
