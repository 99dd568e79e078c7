//! HTTP feed client
//!
//! This module talks to a v1.1-style `statuses/user_timeline` endpoint:
//! - Building HTTP clients with proper user agent strings
//! - Paged timeline requests with optional bearer authentication
//! - Mapping HTTP outcomes onto the three `FeedError` classes
//! - Decoding the JSON payload into `Post` values

use crate::config::{ApiConfig, UserAgentConfig};
use crate::feed::{FeedClient, FeedError, GeoLocation, PageRequest, Post};
use crate::CorpusError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const TIMELINE_PATH: &str = "statuses/user_timeline.json";

/// Provider timestamp layout, e.g. `Wed Aug 27 13:08:45 +0000 2008`
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Status code some providers use instead of 429
const ENHANCE_YOUR_CALM: u16 = 420;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use timeline_corpus::config::UserAgentConfig;
/// use timeline_corpus::feed::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "TimelineCorpus".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Feed client backed by the provider's REST API
pub struct HttpFeedClient {
    client: Client,
    timeline_url: Url,
    bearer_token: Option<String>,
}

impl HttpFeedClient {
    /// Creates a client for the API described by `api`
    pub fn new(api: &ApiConfig, user_agent: &UserAgentConfig) -> Result<Self, CorpusError> {
        let client = build_http_client(user_agent)?;

        // Url::join replaces the last segment unless the base ends in '/'
        let mut base = api.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let timeline_url = Url::parse(&base)?.join(TIMELINE_PATH)?;

        Ok(Self {
            client,
            timeline_url,
            bearer_token: api.bearer_token.clone(),
        })
    }

    pub fn timeline_url(&self) -> &Url {
        &self.timeline_url
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<Post>, FeedError> {
        let mut builder = self.client.get(self.timeline_url.clone()).query(&[
            ("screen_name", request.account.to_string()),
            ("page", request.page.to_string()),
            ("count", request.count.to_string()),
            ("include_entities", "true".to_string()),
            ("include_rts", "true".to_string()),
        ]);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        if let Some(err) = classify_status(response.status(), response.headers(), Utc::now()) {
            return Err(err);
        }

        let statuses: Vec<WireStatus> = response
            .json()
            .await
            .map_err(|e| FeedError::Network(format!("Malformed timeline payload: {}", e)))?;

        statuses.into_iter().map(WireStatus::into_post).collect()
    }
}

/// Classifies a transport-level failure (no HTTP response)
fn classify_transport_error(e: reqwest::Error) -> FeedError {
    if e.is_timeout() {
        FeedError::Network("Request timeout".to_string())
    } else if e.is_connect() {
        FeedError::Network("Connection refused".to_string())
    } else {
        FeedError::Network(e.to_string())
    }
}

/// Maps an HTTP status onto a feed failure, or `None` for success
///
/// | Status | Failure |
/// |--------|---------|
/// | 2xx | none |
/// | 429, 420 | RateLimited |
/// | 401, 403, 404 | AccessDenied |
/// | anything else | Network |
pub(crate) fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Option<FeedError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == ENHANCE_YOUR_CALM {
        return Some(FeedError::RateLimited {
            retry_after: parse_retry_after(headers, now),
        });
    }

    if matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    ) {
        return Some(FeedError::AccessDenied {
            status: status.as_u16(),
        });
    }

    Some(FeedError::Network(format!("HTTP {}", status.as_u16())))
}

/// Reads the advertised cool-down from a throttled response
///
/// `Retry-After` wins, either as delay seconds or as an HTTP date; otherwise
/// `x-rate-limit-reset` (epoch seconds) is converted relative to `now`.
/// Without a usable header the cool-down is zero and only the configured
/// slack applies.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Duration {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };

    if let Some(value) = header("retry-after") {
        if let Ok(seconds) = value.parse::<u64>() {
            return Duration::from_secs(seconds);
        }
        if let Ok(date) = DateTime::parse_from_rfc2822(value) {
            // A date in the past means no wait
            return (date.with_timezone(&Utc) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
        }
        tracing::debug!("Ignoring unparseable Retry-After header: '{}'", value);
    }

    if let Some(value) = header("x-rate-limit-reset") {
        match value.parse::<u64>() {
            Ok(reset) => {
                let now_secs = now.timestamp().max(0) as u64;
                return Duration::from_secs(reset.saturating_sub(now_secs));
            }
            Err(_) => {
                tracing::debug!("Ignoring unparseable x-rate-limit-reset header: '{}'", value)
            }
        }
    }

    Duration::ZERO
}

/// Parses a provider timestamp, accepting RFC 3339 as well
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    id: u64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    created_at: String,
    user: WireUser,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    favorited: Option<bool>,
    #[serde(default)]
    geo: Option<WireGeo>,
    #[serde(default)]
    entities: WireEntities,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    screen_name: String,
}

/// `geo.coordinates` is `[latitude, longitude]`
#[derive(Debug, Deserialize)]
struct WireGeo {
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct WireEntities {
    #[serde(default)]
    urls: Vec<WireUrl>,
    #[serde(default)]
    user_mentions: Vec<WireMention>,
    #[serde(default)]
    hashtags: Vec<WireHashtag>,
}

#[derive(Debug, Deserialize)]
struct WireUrl {
    #[serde(default)]
    expanded_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMention {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireHashtag {
    text: String,
}

impl WireStatus {
    fn into_post(self) -> Result<Post, FeedError> {
        let created_at = parse_created_at(&self.created_at).ok_or_else(|| {
            FeedError::Network(format!(
                "Malformed created_at '{}' on post {}",
                self.created_at, self.id
            ))
        })?;

        Ok(Post {
            id: self.id,
            author: self.user.screen_name,
            created_at,
            text: self.full_text.or(self.text).unwrap_or_default(),
            retweet_count: self.retweet_count,
            favorited: self.favorited.unwrap_or(false),
            geo: self.geo.map(|g| GeoLocation {
                latitude: g.coordinates[0],
                longitude: g.coordinates[1],
            }),
            urls: self
                .entities
                .urls
                .into_iter()
                .filter_map(|u| u.expanded_url.or(u.url))
                .collect(),
            mentions: self
                .entities
                .user_mentions
                .into_iter()
                .map(|m| m.name)
                .collect(),
            hashtags: self.entities.hashtags.into_iter().map(|h| h.text).collect(),
        })
    }
}
