//! Image downloads.
//!
//! [`HttpImageFetcher`] wraps a `reqwest::Client` with a per-request
//! timeout and retries transient failures (timeouts, connection errors,
//! 429 and 5xx answers) with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;

use crate::error::{SearchError, SearchResult};

const USER_AGENT: &str = concat!("exgrip/", env!("CARGO_PKG_VERSION"));

/// Source of raw image bytes for a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> SearchResult<Vec<u8>>;
}

/// Timeout and retry settings for [`HttpImageFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound on a single request, including the body download.
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only.
    pub retries: usize,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 2,
            retry_delay: Duration::from_millis(200),
        }
    }
}

/// Fetches images over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    http: Client,
    backoff: ExponentialBuilder,
}

impl HttpImageFetcher {
    /// Create a new fetcher.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(options: &FetchOptions) -> SearchResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(options.retry_delay)
            .with_max_times(options.retries);

        Ok(Self { http, backoff })
    }

    async fn fetch_once(&self, url: &str) -> SearchResult<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> SearchResult<Vec<u8>> {
        let bytes = (|| self.fetch_once(url))
            .retry(self.backoff.clone())
            .when(SearchError::is_transient)
            .notify(|err, delay| log::warn!("Retrying {} in {:?}: {}", url, delay, err))
            .await?;

        log::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned HTTP responses, one per connection, counting requests.
    async fn serve(responses: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{addr}/image.jpg"), hits)
    }

    const OK: &str = "HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc";
    const UNAVAILABLE: &str =
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    fn fast_options(retries: usize) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(5),
            retries,
            retry_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let (url, hits) = serve(vec![OK]).await;
        let fetcher = HttpImageFetcher::new(&fast_options(0)).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), b"abc");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_status_is_retried() {
        let (url, hits) = serve(vec![UNAVAILABLE, UNAVAILABLE, OK]).await;
        let fetcher = HttpImageFetcher::new(&fast_options(2)).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), b"abc");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let (url, hits) = serve(vec![UNAVAILABLE, UNAVAILABLE, UNAVAILABLE]).await;
        let fetcher = HttpImageFetcher::new(&fast_options(1)).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, SearchError::Http { status: 503, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (url, hits) = serve(vec![NOT_FOUND, OK]).await;
        let fetcher = HttpImageFetcher::new(&fast_options(3)).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, SearchError::Http { status: 404, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
