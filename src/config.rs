//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{EngineConfig, Viewport};

const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Command-line arguments for the website2pdf binary.
#[derive(Debug, Parser)]
#[command(name = "website2pdf", version, about = "Turn any web page into a PDF")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service (default).
    Serve(ServeArgs),
    /// Convert a single URL and write the PDF to disk.
    Convert(ConvertArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "WEBSITE2PDF_LISTEN", default_value = DEFAULT_LISTEN, value_name = "ADDR")]
    pub listen: SocketAddr,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            engine: EngineArgs::default(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Page to convert.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output file; defaults to `<hostname>.pdf` in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Browser knobs shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Chrome/Chromium binary to launch; auto-detected when omitted.
    #[arg(long, env = "WEBSITE2PDF_CHROME_PATH", value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Timeout for browser operations in milliseconds.
    #[arg(long, env = "WEBSITE2PDF_TIMEOUT_MS", default_value_t = 30000, value_name = "MS")]
    pub timeout_ms: u64,

    /// Wait after navigation before the page is measured, in milliseconds.
    #[arg(long, env = "WEBSITE2PDF_SETTLE_MS", default_value_t = 500, value_name = "MS")]
    pub settle_ms: u64,

    /// Viewport (and paper) width in CSS pixels.
    #[arg(long, env = "WEBSITE2PDF_VIEWPORT_WIDTH", default_value_t = 1280, value_name = "PX",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub viewport_width: u32,

    /// Viewport height in CSS pixels.
    #[arg(long, env = "WEBSITE2PDF_VIEWPORT_HEIGHT", default_value_t = 1080, value_name = "PX",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub viewport_height: u32,

    /// User agent override.
    #[arg(long, env = "WEBSITE2PDF_USER_AGENT", value_name = "UA")]
    pub user_agent: Option<String>,

    /// Disable Chrome's sandbox (needed when running as root in containers).
    #[arg(long, env = "WEBSITE2PDF_NO_SANDBOX")]
    pub no_sandbox: bool,
}

impl Default for EngineArgs {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            chrome_path: None,
            timeout_ms: defaults.timeout_ms,
            settle_ms: defaults.settle_ms,
            viewport_width: defaults.viewport.width,
            viewport_height: defaults.viewport.height,
            user_agent: None,
            no_sandbox: false,
        }
    }
}

impl From<&EngineArgs> for EngineConfig {
    fn from(args: &EngineArgs) -> Self {
        EngineConfig {
            viewport: Viewport {
                width: args.viewport_width,
                height: args.viewport_height,
            },
            timeout_ms: args.timeout_ms,
            settle_ms: args.settle_ms,
            user_agent: args.user_agent.clone(),
            chrome_path: args.chrome_path.clone(),
            sandbox: !args.no_sandbox,
        }
    }
}
