//! Outbound asset fetching.
//!
//! Both remote collaborators (font host, icon host) are reached through the
//! [`AssetFetcher`] trait so the pipeline can run against in-memory doubles.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::FetchError;

/// Fetches the body of a URL.
pub trait AssetFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

/// [`AssetFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("og-renderer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(body.to_vec())
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.get(url).boxed()
    }
}

/// Applies an upper bound to a fetch regardless of the fetcher's own limits.
pub async fn fetch_with_timeout(
    fetcher: &dyn AssetFetcher,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    impl AssetFetcher for Stalled {
        fn fetch<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
            futures::future::pending().boxed()
        }
    }

    struct Echo;

    impl AssetFetcher for Echo {
        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
            futures::future::ready(Ok(url.as_bytes().to_vec())).boxed()
        }
    }

    #[tokio::test]
    async fn stalled_fetch_times_out() {
        let result = fetch_with_timeout(&Stalled, "http://x", Duration::from_millis(20)).await;
        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn completed_fetch_passes_through() {
        let body = fetch_with_timeout(&Echo, "abc", Duration::from_secs(1)).await.unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(1)).is_ok());
    }
}
