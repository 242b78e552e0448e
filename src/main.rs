use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use website2pdf::config::{CliArgs, Command, ConvertArgs, ServeArgs};
use website2pdf::convert::{self, ChromeRenderer, PdfRenderer};
use website2pdf::server::{self, AppState};
use website2pdf::{EngineConfig, Error, Result};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = CliArgs::parse();
    let result = match cli.command.unwrap_or_default() {
        Command::Serve(args) => run_serve(args).await,
        Command::Convert(args) => run_convert(args).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let renderer = ChromeRenderer::new(EngineConfig::from(&args.engine));
    server::serve(args.listen, AppState::new(Arc::new(renderer))).await
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let url = convert::validate_url(Some(&args.url))?;
    let renderer = ChromeRenderer::new(EngineConfig::from(&args.engine));
    let pdf = renderer.render(&url).await?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(convert::pdf_filename(&url)));
    std::fs::write(&output, &pdf)
        .map_err(|e| Error::Other(format!("Failed to write {}: {}", output.display(), e)))?;

    info!("Wrote {} ({} bytes)", output.display(), pdf.len());
    Ok(())
}
