//! JSON REST client for the aquaculture backend.

use std::{sync::Arc, time::Duration};

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("session rejected by the server (http {0})")]
    Unauthorized(u16),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("not logged in")]
    NotAuthenticated,
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

/// Backend client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<Arc<SecretString>>,
    retry: ExponentialBuilder,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aquaconsole/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            retry: ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(500))
                .with_max_delay(Duration::from_secs(10))
                .with_max_times(3)
                .with_jitter(),
        })
    }

    /// Attach the bearer token sent with every request
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(Arc::new(token));
        self
    }

    pub fn with_retry(mut self, retry: ExponentialBuilder) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Guard for endpoints that need a session.
    pub fn require_auth(&self) -> Result<(), ApiError> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// GET and decode. Transient failures are retried with backoff.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        (|| async { self.fetch(path).await })
            .retry(self.retry)
            .when(|e: &ApiError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    path,
                    "Backend GET failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let res = self.execute(self.request(Method::GET, path), path).await?;
        decode(res).await
    }

    /// POST a JSON body and decode the response. Never retried.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let res = self
            .execute(self.request(Method::POST, path).json(body), path)
            .await?;
        decode(res).await
    }

    /// Send a write whose response body the caller does not need.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(path, method = %method, "write");
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, path).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let res = builder.send().await.map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => Ok(res),
            s @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ApiError::Unauthorized(s.as_u16()))
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string())),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(ApiError::Http { status, body })
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let bytes = res.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(
            json_error = %e,
            body_preview = %String::from_utf8_lossy(&bytes).chars().take(300).collect::<String>(),
            "Failed to decode backend response"
        );
        ApiError::Serde(e.to_string())
    })
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}
