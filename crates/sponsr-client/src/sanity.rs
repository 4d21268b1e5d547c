use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use sponsr_core::config::{HttpConfig, SanityConfig};
use sponsr_core::error::AppError;
use sponsr_core::format::format_read_time;
use sponsr_core::gateway::ContentGateway;
use sponsr_core::models::Entry;
use sponsr_core::richtext::{Document, ImageUrlBuilder};

/// Fields projected for listing entries.
///
/// `estimatedMinutes` assumes five characters per word and 200 words per
/// minute; it backs up posts that have no explicit `readTime`.
const SUMMARY_PROJECTION: &str = r#"title, excerpt, "tag": categories[0]->title, "date": publishedAt, readTime, "estimatedMinutes": round(length(pt::text(body)) / 5 / 200), "image": mainImage.asset->url, "slug": slug.current"#;

/// Envelope of every query API response.
///
/// ```json
/// { "query": "...", "result": T, "ms": 12 }
/// ```
#[derive(Deserialize, Debug)]
struct QueryResponse<T> {
    result: T,
    #[allow(dead_code)]
    ms: Option<u64>,
}

/// Data Transfer Object for a projected `post` document.
///
/// Every field is optional: GROQ projections yield `null` for anything the
/// document lacks.
///
/// # Examples
///
/// ```
/// use sponsr_client::sanity::SanityPost;
///
/// let json = r#"{
///     "title": "Pricing Sponsorship",
///     "slug": "pricing-sponsorship",
///     "date": "2024-11-10T08:00:00Z",
///     "readTime": null,
///     "estimatedMinutes": 8
/// }"#;
///
/// let post: SanityPost = serde_json::from_str(json).unwrap();
/// assert_eq!(post.slug.as_deref(), Some("pricing-sponsorship"));
/// assert!(post.read_time.is_none());
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SanityPost {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub estimated_minutes: Option<f64>,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub body: Option<Document>,
}

/// HTTP client for the Sanity query API.
///
/// Implements [`ContentGateway`] with GROQ queries against `post` documents,
/// newest first by `publishedAt`.
///
/// # Examples
///
/// ```no_run
/// use sponsr_client::SanityClient;
/// use sponsr_core::config::{HttpConfig, SanityConfig};
/// use sponsr_core::gateway::ContentGateway;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SanityConfig {
///     project_id: Some("abc123".to_string()),
///     ..SanityConfig::default()
/// };
/// let client = SanityClient::new(&config, HttpConfig::default())?;
/// let total = client.fetch_count().await?;
/// println!("{} posts published", total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SanityClient {
    client: Client,
    endpoint: Url,
    http: HttpConfig,
    images: ImageUrlBuilder,
}

impl SanityClient {
    /// Creates a client for the configured project and dataset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotConfigured` if no project id is set.
    /// Returns `AppError::InvalidProjectUrl` if the project id or dataset
    /// contain characters that cannot form an API URL.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(config: &SanityConfig, http: HttpConfig) -> Result<Self, AppError> {
        let project_id = config
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AppError::NotConfigured)?;

        if !project_id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidProjectUrl(project_id.to_string()));
        }
        if config.dataset.is_empty()
            || !config
                .dataset
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(AppError::InvalidProjectUrl(format!(
                "{}/{}",
                project_id, config.dataset
            )));
        }

        let host = if config.use_cdn { "apicdn" } else { "api" };
        let api_version = config.api_version.trim_start_matches('v');
        let raw = format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            project_id, host, api_version, config.dataset
        );
        let endpoint =
            Url::parse(&raw).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let client = Client::builder()
            .user_agent("SponsrInsights/0.1")
            .timeout(http.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            http,
            images: ImageUrlBuilder::new(project_id, config.dataset.clone()),
        })
    }

    /// CDN URL builder for images embedded in article bodies.
    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// Builds the GET URL for a GROQ query. Parameters are JSON-encoded and
    /// passed as `$name=value` pairs.
    fn query_url(&self, query: &str, params: &[(&str, Value)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${}", name), &value.to_string());
            }
        }
        url
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, Value)],
    ) -> Result<T, AppError> {
        let url = self.query_url(query, params);
        let resp = self.request_with_retry(&url).await?;

        let body: QueryResponse<T> = resp
            .json()
            .await
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(body.result)
    }

    /// Makes an HTTP GET request with automatic retry on transient failures.
    ///
    /// Each failure is classified as an [`AppError`]; only errors for which
    /// [`AppError::is_retryable`] holds are retried:
    /// - Network errors, timeouts and 5xx statuses (linear backoff)
    /// - Rate limiting (429, exponential backoff)
    async fn request_with_retry(&self, url: &Url) -> Result<reqwest::Response, AppError> {
        let max_retries = self.http.max_retries.max(1);
        let mut attempt = 1;

        loop {
            let error = match self.client.get(url.clone()).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => self.status_error(resp.status()),
                Err(e) => self.transport_error(&e),
            };

            if !error.is_retryable() || attempt >= max_retries {
                return Err(error);
            }

            let delay = retry_delay(&error, attempt, self.http.retry_base_delay);
            warn!(
                attempt,
                code = %error.code(),
                "Content API request failed, retrying in {:?}: {}", delay, error
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    fn status_error(&self, status: StatusCode) -> AppError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            AppError::RateLimitExceeded
        } else if status.is_server_error() {
            AppError::ServerError(status.as_u16())
        } else {
            AppError::ClientError(format!("HTTP {} from {}", status.as_u16(), self.endpoint))
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.http.timeout.as_secs())
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {}", e))
        } else {
            debug!("Content API request failed: {}", e);
            AppError::ClientError(e.to_string())
        }
    }

    /// Converts a projected post into an [`Entry`].
    ///
    /// Missing text fields become empty strings; a missing slug therefore
    /// yields an entry without a detail page. A missing read time is derived
    /// from the estimated minutes, or from the body when it was fetched.
    ///
    /// # Examples
    ///
    /// ```
    /// use sponsr_client::SanityClient;
    /// use sponsr_client::sanity::SanityPost;
    ///
    /// let post = SanityPost {
    ///     title: Some("Sponsor Retention".to_string()),
    ///     estimated_minutes: Some(8.6),
    ///     ..SanityPost::default()
    /// };
    ///
    /// let entry = SanityClient::into_entry(post);
    /// assert_eq!(entry.title, "Sponsor Retention");
    /// assert_eq!(entry.read_time, "9 min read");
    /// assert!(!entry.has_detail_page());
    /// ```
    pub fn into_entry(post: SanityPost) -> Entry {
        let read_time = post
            .read_time
            .filter(|r| !r.trim().is_empty())
            .or_else(|| {
                post.estimated_minutes
                    .filter(|m| m.is_finite() && *m >= 0.0)
                    .map(|m| format_read_time(m.round() as u32))
            })
            .or_else(|| {
                post.body
                    .as_ref()
                    .filter(|body| !body.is_empty())
                    .map(|body| format_read_time(body.estimated_read_minutes()))
            })
            .unwrap_or_default();

        Entry {
            title: post.title.unwrap_or_default(),
            excerpt: post.excerpt.unwrap_or_default(),
            tag: post.tag.unwrap_or_default(),
            date: post.date.unwrap_or_default(),
            read_time,
            image: post.image.unwrap_or_default(),
            slug: post.slug.unwrap_or_default(),
            author: post.author.filter(|a| !a.trim().is_empty()),
            body: post.body,
        }
    }
}

/// Upper bound on the wait between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Wait before retrying after `error` on the given 1-based `attempt`.
///
/// Rate limiting backs off exponentially, everything else linearly. The
/// result never exceeds [`MAX_RETRY_DELAY`].
fn retry_delay(error: &AppError, attempt: u32, base: Duration) -> Duration {
    let factor = match error {
        AppError::RateLimitExceeded => 2_u32.saturating_pow(attempt),
        _ => attempt,
    };
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

impl ContentGateway for SanityClient {
    async fn fetch_featured(&self) -> Result<Option<Entry>, AppError> {
        let query = format!(
            r#"*[_type == "post" && featured == true] | order(publishedAt desc)[0]{{{}}}"#,
            SUMMARY_PROJECTION
        );
        let post: Option<SanityPost> = self.query(&query, &[]).await?;
        Ok(post.map(Self::into_entry))
    }

    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Entry>, AppError> {
        let query = format!(
            r#"*[_type == "post"] | order(publishedAt desc)[$start...$end]{{{}}}"#,
            SUMMARY_PROJECTION
        );
        let params = [
            ("start", Value::from(offset)),
            ("end", Value::from(offset + limit)),
        ];
        let posts: Option<Vec<SanityPost>> = self.query(&query, &params).await?;
        Ok(posts
            .unwrap_or_default()
            .into_iter()
            .map(Self::into_entry)
            .collect())
    }

    async fn fetch_count(&self) -> Result<usize, AppError> {
        let count: Option<usize> = self.query(r#"count(*[_type == "post"])"#, &[]).await?;
        Ok(count.unwrap_or_default())
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Entry>, AppError> {
        let query = format!(
            r#"*[_type == "post" && slug.current == $slug][0]{{{}, "author": author->name, body}}"#,
            SUMMARY_PROJECTION
        );
        let post: Option<SanityPost> = self.query(&query, &[("slug", Value::from(slug))]).await?;
        Ok(post.map(Self::into_entry))
    }
}
