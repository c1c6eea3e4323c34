use crate::url::path_map::has_extension;
use crate::UrlError;
use url::Url;

/// The traversal boundary of one crawl run
///
/// Established once from the root's post-redirect URL and immutable for the
/// rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base: Url,
    host_dir: String,
}

impl Origin {
    /// Builds the origin from the final URL of the root fetch
    ///
    /// When the last path segment names a file, the base is the directory
    /// containing it, so a root that redirects from `/docs/` to
    /// `/docs/index.html` keeps `/docs/` as its prefix. Otherwise the base is
    /// the URL itself without query or fragment: `/en/latest` stays
    /// `/en/latest` and never admits `/en/stable/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_tap::url::Origin;
    /// use url::Url;
    ///
    /// let root = Url::parse("https://example.com/docs/index.html?v=2").unwrap();
    /// let origin = Origin::from_final_url(&root).unwrap();
    /// assert_eq!(origin.base().as_str(), "https://example.com/docs/");
    /// ```
    pub fn from_final_url(url: &Url) -> Result<Self, UrlError> {
        let names_file = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map_or(false, has_extension);

        let base = if names_file {
            url.join(".").map_err(|e| UrlError::Parse(e.to_string()))?
        } else {
            let mut base = url.clone();
            base.set_query(None);
            base.set_fragment(None);
            base
        };
        let host_dir = host_dir(url)?;
        Ok(Self { base, host_dir })
    }

    /// Literal string-prefix test against the origin base
    ///
    /// This is deliberately not a host comparison: `https://example.com/docs`
    /// (no trailing slash) is outside an origin based at `/docs/`.
    pub fn contains(&self, url: &Url) -> bool {
        url.as_str().starts_with(self.base.as_str())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Directory name the mirrored subtree lives under
    pub fn host_dir(&self) -> &str {
        &self.host_dir
    }
}

/// Returns the host of a URL plus its port when a non-default one is given
pub fn host_dir(url: &Url) -> Result<String, UrlError> {
    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
