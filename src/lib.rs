//! website2pdf
//!
//! Render a web page in headless Chrome and hand it back as a PDF whose
//! single page is as tall as the rendered content.
//!
//! # Features
//!
//! - **CDP Backend** (default): Drives Chrome through the DevTools Protocol
//! - **HTTP service**: A small form plus `GET /api/create-pdf?url=...`
//! - **CLI**: `website2pdf convert <URL>` writes the PDF to disk
//!
//! # Example
//!
//! ```no_run
//! use website2pdf::{Engine, EngineConfig, PdfOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::default();
//! let viewport = config.viewport;
//!
//! let mut engine = website2pdf::new_engine(config)?;
//! engine.load_url("https://example.com")?;
//! let height = engine.content_height()?;
//! let pdf = engine.print_pdf(&PdfOptions::for_page(viewport, height))?;
//! std::fs::write("example.com.pdf", pdf)?;
//! engine.close()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly browser API (worker-thread backed)
#[cfg(feature = "cdp")]
pub mod async_api;

#[cfg(feature = "cdp")]
pub use async_api::Browser;

pub mod config;
pub mod convert;
pub mod server;

pub use convert::PdfRenderer;

/// CSS pixels per inch, as used by Chrome's print pipeline.
pub const CSS_PX_PER_INCH: f64 = 96.0;

/// Configuration for the headless engine
///
/// The defaults match the page geometry the service prints with: a
/// 1280 x 1080 viewport, a 30 second timeout for browser operations and a
/// short settle delay after navigation so late requests can finish.
///
/// # Examples
///
/// ```
/// let cfg = website2pdf::EngineConfig::default();
/// assert_eq!(cfg.viewport.width, 1280);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Timeout for browser operations in milliseconds
    pub timeout_ms: u64,
    /// Delay after navigation completes before the page is measured
    pub settle_ms: u64,
    /// User agent override; Chrome's own when `None`
    pub user_agent: Option<String>,
    /// Chrome/Chromium binary; auto-detected when `None`
    pub chrome_path: Option<std::path::PathBuf>,
    /// Whether to keep Chrome's sandbox enabled
    pub sandbox: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 30000,
            settle_ms: 500,
            user_agent: None,
            chrome_path: None,
            sandbox: true,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 1080,
        }
    }
}

/// Page margins in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Paper geometry and print flags for a PDF export
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// Paper width in CSS pixels
    pub width_px: u32,
    /// Paper height in CSS pixels
    pub height_px: u32,
    /// Print background colors and images
    pub print_background: bool,
    /// Rendering scale
    pub scale: f64,
    /// Page margins
    pub margins: Margins,
}

impl PdfOptions {
    /// One page, as wide as the viewport and as tall as the measured content.
    ///
    /// Heights that are not finite or below one pixel (an empty or fully
    /// out-of-flow `<body>`) fall back to the viewport height.
    pub fn for_page(viewport: Viewport, content_height: f64) -> Self {
        let height_px = if content_height.is_finite() && content_height >= 1.0 {
            content_height.ceil().min(u32::MAX as f64) as u32
        } else {
            viewport.height
        };

        Self {
            width_px: viewport.width,
            height_px,
            print_background: true,
            scale: 1.0,
            margins: Margins::default(),
        }
    }

    pub fn width_in(&self) -> f64 {
        px_to_in(self.width_px)
    }

    pub fn height_in(&self) -> f64 {
        px_to_in(self.height_px)
    }
}

/// Convert CSS pixels to inches.
pub fn px_to_in(px: u32) -> f64 {
    px as f64 / CSS_PX_PER_INCH
}

/// Core trait for headless engine implementations
pub trait Engine {
    /// Create a new engine instance with the given configuration
    fn new(config: EngineConfig) -> Result<Self>
    where
        Self: Sized;

    /// Load a URL and wait for the page to be ready
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Rendered height of the document body in CSS pixels
    fn content_height(&self) -> Result<f64>;

    /// Export the current page as PDF bytes
    fn print_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>>;

    /// Close the engine and clean up resources
    fn close(self) -> Result<()>;
}

/// Create a new engine instance with the default backend
#[cfg(feature = "cdp")]
pub fn new_engine(config: EngineConfig) -> Result<impl Engine> {
    cdp::CdpEngine::new(config)
}
