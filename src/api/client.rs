use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::api::params::{Capability, Query};
use crate::api::retry::RetryPolicy;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Article, QueryResult, SourceInfo};

/// Shortest string the provider would ever issue as a key; anything
/// shorter fails fast instead of burning a request.
const MIN_KEY_LEN: usize = 32;

/// Gateway to the news provider. Issues one call at a time, classifies
/// failures into the `ApiError` taxonomy and retries only transient
/// network errors.
#[derive(Debug)]
pub struct NewsClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let api_key = config.api_key.as_deref().unwrap_or("").trim();
        if api_key.len() < MIN_KEY_LEN {
            return Err(ApiError::Auth(
                "NEWS_API_KEY is missing or too short to be a valid key; \
                 set it in config.toml or the environment"
                    .into(),
            ));
        }

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|_| ApiError::Auth("API key contains invalid characters".into()))?;
        key_value.set_sensitive(true);
        headers.insert("X-Api-Key", key_value);

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transient(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidParameter {
            field: "base_url",
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::new(
                config.retry_attempts,
                Duration::from_millis(config.retry_base_ms),
            ),
        })
    }

    /// Fetch articles for a headlines or search query.
    pub async fn fetch(&self, query: &Query) -> Result<QueryResult, ApiError> {
        if query.capability == Capability::Sources {
            return Err(ApiError::InvalidParameter {
                field: "capability",
                reason: "sources requests return outlet metadata; call `sources`".into(),
            });
        }
        let (status, retry_after, body) = self.request(query).await?;
        Self::parse_articles(status, retry_after, &body, query)
    }

    /// List available news outlets.
    pub async fn sources(&self, query: &Query) -> Result<Vec<SourceInfo>, ApiError> {
        if query.capability != Capability::Sources {
            return Err(ApiError::InvalidParameter {
                field: "capability",
                reason: "article requests go through `fetch`".into(),
            });
        }
        let (status, retry_after, body) = self.request(query).await?;
        Self::parse_sources(status, retry_after, &body)
    }

    /// One HTTP exchange with the retry loop around it. Parameters are
    /// validated once, before any network traffic.
    async fn request(&self, query: &Query) -> Result<(u16, Option<u64>, String), ApiError> {
        let params = query.build()?;
        let url = self
            .base_url
            .join(query.capability.endpoint())
            .map_err(|e| ApiError::InvalidParameter {
                field: "base_url",
                reason: e.to_string(),
            })?;

        self.retry
            .run(
                |attempt| {
                    let url = url.clone();
                    let params = &params;
                    async move {
                        tracing::debug!(
                            endpoint = query.capability.endpoint(),
                            attempt,
                            "requesting"
                        );
                        let response = self
                            .http
                            .get(url)
                            .query(params)
                            .send()
                            .await
                            .map_err(classify_transport)?;
                        let status = response.status().as_u16();
                        let retry_after = parse_retry_after(response.headers());
                        let body = response.text().await.map_err(classify_transport)?;
                        Ok((status, retry_after, body))
                    }
                },
                tokio::time::sleep,
            )
            .await
    }

    /// Classify an HTTP exchange and normalize the article payload.
    /// Items missing a title or url cannot be deduplicated or displayed,
    /// so they are dropped and only counted.
    pub fn parse_articles(
        status: u16,
        retry_after: Option<u64>,
        body: &str,
        query: &Query,
    ) -> Result<QueryResult, ApiError> {
        let envelope = decode_envelope(status, retry_after, body)?;

        let mut dropped = 0usize;
        let mut articles = Vec::with_capacity(envelope.articles.len());
        for raw in envelope.articles {
            match normalize_article(raw) {
                Some(article) => articles.push(article),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "dropped articles missing a title or url");
        }

        let total_results = envelope.total_results.unwrap_or(articles.len() as u64);
        Ok(QueryResult {
            articles,
            total_results,
            dropped,
            query: query.clone(),
        })
    }

    /// Classify an HTTP exchange and normalize the sources payload.
    pub fn parse_sources(
        status: u16,
        retry_after: Option<u64>,
        body: &str,
    ) -> Result<Vec<SourceInfo>, ApiError> {
        let envelope = decode_envelope(status, retry_after, body)?;
        Ok(envelope
            .sources
            .into_iter()
            .filter_map(normalize_source)
            .collect())
    }
}

/// Provider response envelope. Error replies reuse the same shape with
/// `status: "error"` plus `code`/`message`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(default)]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: RawSourceRef,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSourceRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    language: Option<String>,
    country: Option<String>,
}

fn decode_envelope(
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Result<Envelope, ApiError> {
    match status {
        401 => Err(ApiError::Auth(
            provider_message(body).unwrap_or_else(|| "invalid API key".into()),
        )),
        429 => Err(ApiError::RateLimited { retry_after }),
        s if !(200..300).contains(&s) => Err(ApiError::Provider {
            status: s,
            message: provider_message(body).unwrap_or_else(|| format!("HTTP {s}")),
        }),
        _ => {
            let envelope: Envelope = serde_json::from_str(body)
                .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
            if envelope.status == "error" {
                let code = envelope.code.as_deref().unwrap_or("unknown");
                let message = envelope.message.as_deref().unwrap_or("unknown error");
                return Err(ApiError::Provider {
                    status,
                    message: format!("[{code}] {message}"),
                });
            }
            Ok(envelope)
        }
    }
}

/// Best-effort extraction of the provider's error text.
fn provider_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        code: Option<String>,
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match (parsed.code, parsed.message) {
        (Some(code), Some(message)) => Some(format!("[{code}] {message}")),
        (None, Some(message)) => Some(message),
        _ => None,
    }
}

fn normalize_article(raw: RawArticle) -> Option<Article> {
    let title = raw.title.filter(|t| !t.trim().is_empty())?;
    let url = raw.url.filter(|u| !u.trim().is_empty())?;
    Some(Article {
        title,
        source: raw
            .source
            .name
            .unwrap_or_else(|| "Unknown Source".to_string()),
        author: raw.author,
        description: raw.description,
        url,
        published_at: raw.published_at,
        content: raw.content,
    })
}

fn normalize_source(raw: RawSource) -> Option<SourceInfo> {
    let id = raw.id.filter(|i| !i.trim().is_empty())?;
    let name = raw.name.filter(|n| !n.trim().is_empty())?;
    Some(SourceInfo {
        id,
        name,
        description: raw.description,
        category: raw.category,
        language: raw.language,
        country: raw.country,
    })
}

fn classify_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transient("request timed out".into())
    } else if err.is_connect() {
        ApiError::Transient(format!("connection failed: {err}"))
    } else {
        ApiError::Transient(err.to_string())
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
