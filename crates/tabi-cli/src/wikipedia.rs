//! MediaWiki full-text search as a [`SearchSource`].

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use tabi_core::search::{SearchError, SearchHit, SearchSource};

/// Japanese Wikipedia API.
pub const DEFAULT_ENDPOINT: &str = "https://ja.wikipedia.org/w/api.php";

const USER_AGENT: &str = concat!("tabi/", env!("CARGO_PKG_VERSION"));

/// A complete `<...>` tag. An unclosed `<` is literal text.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

/// Searches a MediaWiki `api.php` endpoint with `list=search`.
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl WikipediaSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja,en;q=0.8"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn map_err(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else if err.is_decode() {
            SearchError::Malformed(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SearchSource for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("utf8", "1"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Transport(format!(
                "{} returned HTTP {status}",
                self.endpoint
            )));
        }

        let body = response.text().await.map_err(|e| self.map_err(e))?;
        let hits = parse_response(&body)?;
        debug!(query, hits = hits.len(), "wikipedia search finished");
        Ok(hits)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    query: Option<QueryBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Parse a `list=search` response body into hits with markup removed.
///
/// A body without a `query` block (e.g. an API warning) yields no hits.
/// Hits whose title is blank after stripping are dropped.
pub fn parse_response(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let parsed: ApiResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Malformed(e.to_string()))?;

    Ok(parsed
        .query
        .unwrap_or_default()
        .search
        .into_iter()
        .filter_map(|raw| {
            let title = strip_markup(&raw.title);
            if title.is_empty() {
                return None;
            }
            Some(SearchHit {
                title,
                snippet: strip_markup(&raw.snippet),
            })
        })
        .collect())
}

/// Remove `<...>` tags and trim.
pub fn strip_markup(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_spans() {
        assert_eq!(
            strip_markup("<span class=\"searchmatch\">清水</span>寺"),
            "清水寺"
        );
        assert_eq!(strip_markup("  伏見稲荷大社 "), "伏見稲荷大社");
        assert_eq!(strip_markup("<b></b>"), "");
        assert_eq!(strip_markup("a > b"), "a > b");
    }

    #[test]
    fn unclosed_angle_bracket_is_kept() {
        assert_eq!(
            strip_markup("<span class=\"searchmatch\">A</span> < B 公園"),
            "A < B 公園"
        );
        assert_eq!(strip_markup("x < y"), "x < y");
    }

    #[test]
    fn parses_search_results_in_order() {
        let body = r#"{
            "batchcomplete": "",
            "query": {
                "searchinfo": {"totalhits": 2},
                "search": [
                    {"ns": 0, "title": "金閣寺", "snippet": "<span class=\"searchmatch\">京都</span>市北区"},
                    {"ns": 0, "title": "嵐山", "snippet": ""}
                ]
            }
        }"#;
        let hits = parse_response(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "金閣寺");
        assert_eq!(hits[0].snippet, "京都市北区");
        assert_eq!(hits[1].title, "嵐山");
    }

    #[test]
    fn drops_blank_titles() {
        let body = r#"{"query": {"search": [
            {"title": "<span></span>"},
            {"title": "銀閣寺"}
        ]}}"#;
        let titles: Vec<_> = parse_response(body)
            .unwrap()
            .into_iter()
            .map(|h| h.title)
            .collect();
        assert_eq!(titles, vec!["銀閣寺"]);
    }

    #[test]
    fn missing_query_block_is_empty() {
        let body = r#"{"warnings": {"main": {"*": "Unrecognized parameter"}}}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            parse_response("<html>rate limited</html>"),
            Err(SearchError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let source =
            WikipediaSearch::new("http://127.0.0.1:9/w/api.php", Duration::from_secs(2)).unwrap();
        let result = source.search("京都 観光", 5).await;
        assert!(result.is_err());
    }
}
