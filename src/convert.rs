//! URL validation, download naming and the renderer seam used by the HTTP
//! handlers and the CLI.

use async_trait::async_trait;
use url::Url;

use crate::{Error, Result};

/// Parse and vet a user-supplied URL.
///
/// Only absolute `http`/`https` URLs with a host are accepted; everything
/// else would either fail inside the browser or hand out local resources.
pub fn validate_url(raw: Option<&str>) -> Result<Url> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(Error::MissingUrl)?;

    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::InvalidUrl(format!(
                "{}: unsupported scheme `{}`",
                raw, other
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::InvalidUrl(format!("{}: missing host", raw)));
    }

    Ok(url)
}

/// Download name for a rendered page: `<hostname>.pdf`.
pub fn pdf_filename(url: &Url) -> String {
    format!("{}.pdf", url.host_str().unwrap_or("download"))
}

/// `Content-Disposition` value offering the PDF as an attachment.
pub fn content_disposition(url: &Url) -> String {
    format!("attachment; filename=\"{}\"", pdf_filename(url))
}

/// Something that can turn a page URL into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<Vec<u8>>;
}

#[cfg(feature = "cdp")]
pub use chrome::ChromeRenderer;

#[cfg(feature = "cdp")]
mod chrome {
    use async_trait::async_trait;
    use log::{debug, info, warn};
    use std::marker::PhantomData;
    use std::time::Instant;
    use url::Url;

    use super::PdfRenderer;
    use crate::async_api::{Browser, Page};
    use crate::cdp::CdpEngine;
    use crate::{Engine, EngineConfig, PdfOptions, Result};

    /// Launches a fresh browser for every conversion.
    ///
    /// `E` is the engine the worker drives; headless Chrome unless a caller
    /// picks another backend through [`ChromeRenderer::with_engine`].
    pub struct ChromeRenderer<E = CdpEngine> {
        config: EngineConfig,
        engine: PhantomData<fn() -> E>,
    }

    impl ChromeRenderer {
        pub fn new(config: EngineConfig) -> Self {
            Self::with_engine(config)
        }
    }

    impl<E: Engine + 'static> ChromeRenderer<E> {
        pub fn with_engine(config: EngineConfig) -> Self {
            Self {
                config,
                engine: PhantomData,
            }
        }

        async fn print(&self, page: &Page, url: &Url) -> Result<Vec<u8>> {
            page.goto(url.as_str()).await?;
            let height = page.content_height().await?;
            let options = PdfOptions::for_page(self.config.viewport, height);
            debug!(
                "measured {} at {:.1}px, printing {}x{}px",
                url, height, options.width_px, options.height_px
            );
            page.pdf(options).await
        }
    }

    #[async_trait]
    impl<E: Engine + 'static> PdfRenderer for ChromeRenderer<E> {
        async fn render(&self, url: &Url) -> Result<Vec<u8>> {
            let started = Instant::now();
            let config = self.config.clone();
            let browser = Browser::spawn(move || E::new(config)).await?;

            let result = match browser.new_page().await {
                Ok(page) => self.print(&page, url).await,
                Err(e) => Err(e),
            };

            // The browser is closed whatever happened to the page.
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser after rendering {}: {}", url, e);
            }

            if let Ok(pdf) = &result {
                info!(
                    "rendered {} ({} bytes) in {}ms",
                    url,
                    pdf.len(),
                    started.elapsed().as_millis()
                );
            }
            result
        }
    }

}
