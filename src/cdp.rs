//! Chrome DevTools Protocol adapter implementation

use crate::{Engine, EngineConfig, Error, PdfOptions, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Navigation failures that mean the target itself is bad rather than the
/// browser or the network path to it.
const INVALID_TARGET_MARKERS: &[&str] = &[
    "net::ERR_NAME_NOT_RESOLVED",
    "net::ERR_INVALID_URL",
    "Cannot navigate to invalid URL",
];

const BODY_HEIGHT_SCRIPT: &str = r#"
    (function() {
        const body = document.body;
        return body ? body.getBoundingClientRect().height : 0;
    })()
"#;

/// CDP-based headless engine implementation (uses the `headless_chrome` crate)
///
/// This adapter launches a headless Chrome instance, manages a single tab,
/// and provides the `Engine` trait implementation over it.
pub struct CdpEngine {
    browser: Browser,
    tab: Arc<Tab>,
    config: EngineConfig,
}

impl Engine for CdpEngine {
    fn new(config: EngineConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let timeout = Duration::from_millis(config.timeout_ms);

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(config.sandbox)
            .path(config.chrome_path.clone())
            .window_size(Some((config.viewport.width, config.viewport.height)))
            // The connection must outlive the slowest single operation.
            .idle_browser_timeout(timeout.max(Duration::from_secs(30)))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(timeout);

        if let Some(user_agent) = &config.user_agent {
            tab.set_user_agent(user_agent, None, None)?;
        }

        debug!(
            "launched headless chrome ({}x{} viewport)",
            config.viewport.width, config.viewport.height
        );

        Ok(Self { browser, tab, config })
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| navigation_error(url, &e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| navigation_error(url, &e.to_string()))?;

        // Give late requests (fonts, lazy images) a chance to land before measuring.
        if self.config.settle_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        }

        Ok(())
    }

    fn content_height(&self) -> Result<f64> {
        let eval = self
            .tab
            .evaluate(BODY_HEIGHT_SCRIPT, false)
            .map_err(|e| Error::RenderError(format!("Failed to measure page: {}", e)))?;

        eval.value
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| Error::RenderError("Page height measurement returned no number".into()))
    }

    fn print_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        let print_options = PrintToPdfOptions {
            paper_width: Some(options.width_in()),
            paper_height: Some(options.height_in()),
            print_background: Some(options.print_background),
            scale: Some(options.scale),
            margin_top: Some(crate::px_to_in(options.margins.top)),
            margin_right: Some(crate::px_to_in(options.margins.right)),
            margin_bottom: Some(crate::px_to_in(options.margins.bottom)),
            margin_left: Some(crate::px_to_in(options.margins.left)),
            ..Default::default()
        };

        self.tab
            .print_to_pdf(Some(print_options))
            .map_err(|e| Error::RenderError(format!("PDF export failed: {}", e)))
    }

    fn close(self) -> Result<()> {
        // Drop the tab first; dropping the browser kills the child process.
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

fn navigation_error(url: &str, reason: &str) -> Error {
    if INVALID_TARGET_MARKERS.iter().any(|m| reason.contains(m)) {
        Error::HostNotFound(format!("{} ({})", url, reason))
    } else {
        Error::LoadError(format!("Navigation to {} failed: {}", url, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_hosts_are_invalid_targets() {
        let err = navigation_error("https://nope.invalid/", "Navigate failed: net::ERR_NAME_NOT_RESOLVED");
        assert!(matches!(err, Error::HostNotFound(_)));

        let err = navigation_error(
            "foo",
            "Protocol error (Page.navigate): Cannot navigate to invalid URL",
        );
        assert!(err.is_invalid_target());
    }

    #[test]
    fn other_navigation_failures_are_load_errors() {
        let err = navigation_error("http://127.0.0.1:1/", "Navigate failed: net::ERR_CONNECTION_REFUSED");
        assert!(matches!(err, Error::LoadError(_)));
        assert!(err.to_string().contains("ERR_CONNECTION_REFUSED"));
    }

    #[test]
    fn test_cdp_engine_creation() {
        let config = EngineConfig::default();
        // This test requires Chrome to be installed, so we skip it in CI
        if std::env::var("CI").is_ok() {
            return;
        }
        let result = CdpEngine::new(config);
        match result {
            Ok(engine) => engine.close().unwrap(),
            Err(e) => eprintln!(
                "Skipping CDP engine creation test because Chrome is not available or failed to launch: {}",
                e
            ),
        }
    }
}
