//! Authenticated HTTP Client for the Catalog API
//!
//! Wraps `reqwest` with the credential headers, explicit timeouts, an
//! optional request throttle and optional retries with exponential backoff.

use governor::{Quota, RateLimiter, state::NotKeyed, clock::DefaultClock, middleware::NoOpMiddleware};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Settings;
use super::models::truncate;
use super::traits::{ApiError, ApiResult};

const LOGIN: HeaderName = HeaderName::from_static("login");
const APIKEY: HeaderName = HeaderName::from_static("apikey");
const JSON: HeaderValue = HeaderValue::from_static("application/json");

type Limiter = RateLimiter<NotKeyed, governor::state::InMemoryState, DefaultClock, NoOpMiddleware>;

/// HTTP client carrying the catalog credentials on every request
pub struct ThrottledClient {
    /// Inner HTTP client with the auth headers as defaults
    client: Client,

    /// Request throttle, absent when unlimited
    limiter: Option<Limiter>,

    /// Retries after a failed attempt
    max_retries: u32,
}

/// Build the header map sent with every request
pub fn auth_headers(login: &str, apikey: &str) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, JSON);
    headers.insert(CONTENT_TYPE, JSON);
    for (name, value) in [(LOGIN, login), (APIKEY, apikey)] {
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Config(format!("invalid `{name}` header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }
    Ok(headers)
}

impl ThrottledClient {
    /// Create a client from validated settings
    pub fn new(settings: &Settings) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(concat!("catalog-census/", env!("CARGO_PKG_VERSION")))
            .default_headers(auth_headers(&settings.login, &settings.apikey)?)
            .build()?;

        let limiter = NonZeroU32::new(settings.requests_per_minute)
            .map(|rate| RateLimiter::direct(Quota::per_minute(rate)));

        Ok(ThrottledClient {
            client,
            limiter,
            max_retries: settings.max_retries,
        })
    }

    /// POST a JSON body, with throttling and retries applied
    pub async fn post_json<T: serde::Serialize + ?Sized>(&self, url: &str, body: &T) -> ApiResult<Response> {
        self.execute_with_retry(self.client.post(url).json(body)).await
    }

    /// Wait for the throttle and execute one attempt
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            warn!(retry_after_secs = retry_after, "Rate limited by catalog API");

            return Err(ApiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: truncate(&body, 500).to_string(),
            });
        }

        Ok(response)
    }

    /// Execute request with retries and exponential backoff
    async fn execute_with_retry(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let mut backoff = Duration::from_millis(500);
        let mut attempt = 0;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| ApiError::Internal("request body cannot be retried".to_string()))?;

            let error = match self.execute(request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt >= self.max_retries || !is_retryable(&e) => return Err(e),
                Err(e) => e,
            };

            attempt += 1;
            let wait = match &error {
                ApiError::RateLimited { retry_after_secs } => Duration::from_secs(*retry_after_secs),
                _ => backoff,
            };
            debug!(attempt, wait_ms = wait.as_millis() as u64, error = %error, "Retrying request");
            tokio::time::sleep(wait).await;
            backoff = (backoff * 2).min(Duration::from_secs(30));
        }
    }
}

/// Transport failures, throttling and server errors are worth another attempt
fn is_retryable(error: &ApiError) -> bool {
    match error {
        ApiError::Http(_) | ApiError::RateLimited { .. } => true,
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::Parse(_)
        | ApiError::MissingData { .. }
        | ApiError::Config(_)
        | ApiError::Internal(_) => false,
    }
}
