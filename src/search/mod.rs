//! Tavily search API adapter.
//!
//! [`TavilySearch`] holds a fixed request configuration (result count, topic,
//! answer/raw-content/image flags, depth) and turns a free-text query into a
//! [`SearchResponse`]: at most `max_results` hits plus Tavily's synthesized
//! answer when one was requested.
//!
//! ```no_run
//! use tavily_agent::search::TavilySearch;
//!
//! # async fn example() -> tavily_agent::error::Result<()> {
//! let search = TavilySearch::builder().api_key("tvly-...".to_string()).build();
//! let response = search.search("latest Rust release").await?;
//! for hit in &response.results {
//!     println!("{} - {}", hit.title, hit.url);
//! }
//! # Ok(())
//! # }
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::provider::http::{bearer_headers, shared_client, status_to_error};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Search category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Topic {
    #[default]
    General,
    News,
    Finance,
}

/// How hard Tavily searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

/// Restrict results to a publication window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

/// Fixed-configuration Tavily client.
#[derive(Debug, Clone, Builder)]
pub struct TavilySearch {
    api_key: String,
    #[builder(default = 3)]
    max_results: u32,
    #[builder(default)]
    topic: Topic,
    #[builder(default = true)]
    include_answer: bool,
    #[builder(default = false)]
    include_raw_content: bool,
    #[builder(default = false)]
    include_images: bool,
    #[builder(default)]
    search_depth: SearchDepth,
    #[builder(into)]
    base_url: Option<String>,
}

/// Per-call parameters the model may set through the tool interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOverrides {
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub time_range: Option<TimeRange>,
    pub topic: Option<Topic>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Snippet extracted by Tavily.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Result of one search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    topic: Topic,
    search_depth: SearchDepth,
    max_results: u32,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include_domains: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exclude_domains: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    time_range: Option<TimeRange>,
}

/// Tavily returns images either as bare URLs or as `{url, description}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawImage {
    Url(String),
    Described { url: String },
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    query: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
    #[serde(default)]
    images: Vec<RawImage>,
    #[serde(default)]
    response_time: Option<f64>,
}

impl TavilySearch {
    /// The configuration the search agent and the drivers use.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let api_key = config
            .get_api_key("tavily")
            .ok_or(AgentError::MissingCredential {
                var: "TAVILY_API_KEY",
            })?;
        Ok(Self::builder()
            .api_key(api_key)
            .maybe_base_url(config.get_base_url("tavily"))
            .build())
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn search_depth(&self) -> SearchDepth {
        self.search_depth
    }

    /// Search with the fixed configuration.
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.search_with(query, &SearchOverrides::default()).await
    }

    /// Search, applying per-call overrides on top of the fixed configuration.
    pub async fn search_with(&self, query: &str, overrides: &SearchOverrides) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::InvalidArgument("search query is empty".into()));
        }

        let body = SearchRequest {
            query,
            topic: overrides.topic.unwrap_or(self.topic),
            search_depth: self.search_depth,
            max_results: self.max_results,
            include_answer: self.include_answer,
            include_raw_content: self.include_raw_content,
            include_images: self.include_images,
            include_domains: &overrides.include_domains,
            exclude_domains: &overrides.exclude_domains,
            time_range: overrides.time_range,
        };
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        let url = format!("{base_url}/search");

        debug!(query, topic = %body.topic, depth = %body.search_depth, "tavily search");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let raw: RawSearchResponse = resp.json().await?;
        let mut results = raw.results;
        results.truncate(self.max_results as usize);

        debug!(hits = results.len(), has_answer = raw.answer.is_some(), "tavily search done");

        Ok(SearchResponse {
            query: if raw.query.is_empty() {
                query.to_string()
            } else {
                raw.query
            },
            answer: raw.answer.filter(|a| !a.trim().is_empty()),
            results,
            images: raw
                .images
                .into_iter()
                .map(|img| match img {
                    RawImage::Url(url) | RawImage::Described { url } => url,
                })
                .collect(),
            response_time: raw.response_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_the_fixed_configuration() {
        let search = TavilySearch::builder().api_key("k".to_string()).build();
        assert_eq!(search.max_results, 3);
        assert_eq!(search.topic, Topic::General);
        assert!(search.include_answer);
        assert!(!search.include_raw_content);
        assert!(!search.include_images);
        assert_eq!(search.search_depth, SearchDepth::Basic);
        assert_eq!(search.base_url, None);
    }

    #[test]
    fn request_omits_empty_filters() {
        let body = SearchRequest {
            query: "rust",
            topic: Topic::News,
            search_depth: SearchDepth::Advanced,
            max_results: 3,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
            include_domains: &[],
            exclude_domains: &[],
            time_range: Some(TimeRange::Week),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["topic"], "news");
        assert_eq!(value["search_depth"], "advanced");
        assert_eq!(value["time_range"], "week");
        assert!(value.get("include_domains").is_none());
    }

    #[test]
    fn enums_parse_from_strings() {
        assert_eq!("finance".parse::<Topic>().unwrap(), Topic::Finance);
        assert_eq!("month".parse::<TimeRange>().unwrap(), TimeRange::Month);
        assert!("hourly".parse::<TimeRange>().is_err());
    }

    #[test]
    fn from_config_requires_key() {
        let err = TavilySearch::from_config(&AgentConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            AgentError::MissingCredential {
                var: "TAVILY_API_KEY"
            }
        ));
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_request() {
        let search = TavilySearch::builder()
            .api_key("k".to_string())
            .base_url("http://127.0.0.1:9")
            .build();
        let err = search.search("   ").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidArgument(_)));
    }
}
