//! Error types for website2pdf

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a URL into a PDF
#[derive(Error, Debug)]
pub enum Error {
    /// No `url` value was supplied
    #[error("URL is required")]
    MissingUrl,

    /// The supplied value is not an http(s) URL with a host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The browser could not resolve or navigate to the host
    #[error("Website not found: {0}")]
    HostNotFound(String),

    /// Failed to launch or configure the browser
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Failed to measure the page or print it
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the failure is down to the target the caller asked for rather
    /// than to the service itself.
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::HostNotFound(_))
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}
