use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Empty accepts any content type.
    pub allowed_content_types: Vec<String>,
}

impl FetchSettings {
    /// Source pages: HTML only, directory listings can be large.
    pub fn for_pages() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }

    /// Selected files: any content type, generous size and time limits.
    pub fn for_downloads() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10 * 60),
            redirect_limit: 5,
            max_bytes: 4 * 1024 * 1024 * 1024,
            allowed_content_types: Vec::new(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::for_pages()
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError>;

    /// Streams the body into `out` instead of buffering it. The returned
    /// metadata's `byte_len` is the number of bytes written.
    async fn fetch_to(
        &self,
        url: &Url,
        out: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<FetchMetadata, FetchError> {
        let output = self.fetch(url).await?;
        out.write_all(&output.bytes).await.map_err(write_error)?;
        out.flush().await.map_err(write_error)?;
        Ok(output.metadata)
    }
}

/// A response that passed the status, length and content-type checks.
struct Accepted {
    response: reqwest::Response,
    redirect_counter: Arc<AtomicUsize>,
    final_url: String,
    content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let accepted = self.start(url).await?;
        let mut bytes = Vec::new();
        let mut stream = accepted.response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url: accepted.final_url,
            redirect_count: accepted.redirect_counter.load(Ordering::Relaxed),
            content_type: accepted.content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }

    async fn fetch_to(
        &self,
        url: &Url,
        out: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<FetchMetadata, FetchError> {
        let accepted = self.start(url).await?;
        let mut written: u64 = 0;
        let mut stream = accepted.response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            written += chunk.len() as u64;
            if written > self.settings.max_bytes {
                return Err(self.too_large(written));
            }
            out.write_all(&chunk).await.map_err(write_error)?;
        }
        out.flush().await.map_err(write_error)?;

        Ok(FetchMetadata {
            original_url: url.to_string(),
            final_url: accepted.final_url,
            redirect_count: accepted.redirect_counter.load(Ordering::Relaxed),
            content_type: accepted.content_type,
            byte_len: written,
        })
    }
}

impl ReqwestFetcher {
    async fn start(&self, url: &Url) -> Result<Accepted, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        Ok(Accepted {
            response,
            redirect_counter,
            final_url,
            content_type,
        })
    }
}

fn write_error(err: std::io::Error) -> FetchError {
    FetchError::new(FailureKind::Write, err.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
