//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests that follow redirects transparently
//! - Error classification (transport vs. HTTP status)
//! - HTML classification of the response

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A successfully fetched response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the request was issued for
    pub requested_url: Url,

    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Whether this response is mirrored and scanned for links
    pub fn is_html(&self) -> bool {
        is_html(&self.final_url, self.content_type.as_deref())
    }

    /// Returns true when the server redirected us somewhere else
    pub fn was_redirected(&self) -> bool {
        self.requested_url != self.final_url
    }

    /// Body decoded for link discovery
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Classifies a response as HTML
///
/// A response is HTML if its path ends in `.html` or its Content-Type
/// mentions `text/html`.
///
/// # Arguments
///
/// * `url` - Final URL of the response
/// * `content_type` - Content-Type header value, if the server sent one
///
/// # Example
///
/// ```
/// use site_tap::crawler::is_html;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/a.html").unwrap();
/// let image = Url::parse("https://example.com/logo.png").unwrap();
/// assert!(is_html(&page, None));
/// assert!(is_html(&image, Some("text/html; charset=utf-8")));
/// assert!(!is_html(&image, Some("image/png")));
/// ```
pub fn is_html(url: &Url, content_type: Option<&str>) -> bool {
    url.path().ends_with(".html") || content_type.map_or(false, |ct| ct.contains("text/html"))
}

/// Performs single GETs for one crawl run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with its own HTTP client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_tap::config::HttpConfig;
    /// use site_tap::crawler::Fetcher;
    ///
    /// let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
    /// ```
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a URL, following redirects
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - 2xx response with its final URL and body
    /// * `Err(FetchError)` - Transport failure or non-2xx status
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Non-2xx status | `FetchError::Status` |
    /// | Timeout | `FetchError::Timeout` |
    /// | DNS / connect / redirect limit | `FetchError::Transport` |
    /// | Body read failure | `FetchError::Body` |
    ///
    /// No retries are made; the first failure is final for this URL.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| FetchError::Body {
            url: final_url.to_string(),
            source: e,
        })?;

        tracing::trace!(
            "Fetched {} -> {} ({} bytes, {:?})",
            url,
            final_url,
            body.len(),
            content_type
        );

        Ok(FetchedPage {
            requested_url: url.clone(),
            final_url,
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - HTTP settings (user agent, timeouts, redirect limit)
///
/// # Returns
///
/// * `Ok(Client)` - Client that follows at most `max_redirects` redirects
/// * `Err(reqwest::Error)` - The TLS backend could not be initialized
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
