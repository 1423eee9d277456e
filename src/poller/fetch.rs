//! Sentinel retrieval.
//!
//! A fetch succeeds only when the first byte of the response body is `.`.
//! The HTTP status is not inspected: most webservers answer a missing file
//! with an HTML page, which starts with `<` and fails the check anyway.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// The byte whose presence triggers the notification.
pub const SENTINEL: u8 = b'.';

/// Reasons a fetch did not yield the sentinel.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network, DNS or protocol failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was empty.
    #[error("no content")]
    Empty,

    /// The body starts with something other than the sentinel.
    #[error("got '{}'", as_char(.got))]
    Mismatch { got: u8 },
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Something that can check a URL for the sentinel.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// Check the first byte of a body.
pub fn check_first_byte(first: Option<u8>) -> Result<(), FetchError> {
    match first {
        None => Err(FetchError::Empty),
        Some(SENTINEL) => Ok(()),
        Some(got) => Err(FetchError::Mismatch { got }),
    }
}

/// Fetches over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher. `timeout` bounds the whole request; `None` leaves it
    /// to the client defaults.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("polldot/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<(), FetchError> {
        let mut response = self.client.get(url.as_str()).send().await?;

        tracing::debug!(url = %url, status = %response.status(), "Response received");

        // Chunks may be empty; keep reading until a byte shows up or the body ends.
        while let Some(chunk) = response.chunk().await? {
            if let Some(&first) = chunk.first() {
                return check_first_byte(Some(first));
            }
        }

        check_first_byte(None)
    }
}
