use crate::Engine;
use crate::{cdp, EngineConfig, Error, PdfOptions, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Goto(String, oneshot::Sender<Result<()>>),
    ContentHeight(oneshot::Sender<Result<f64>>),
    Pdf(PdfOptions, oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly browser abstraction backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous `CdpEngine` instance and executes
/// commands sent from async tasks so callers can use an async interface
/// without blocking the runtime on CDP round trips. When every handle is
/// dropped the worker exits and the browser process goes with it.
#[derive(Clone)]
pub struct Browser {
    cmd_tx: Sender<Command>,
}

/// A handle representing the page owned by the browser worker.
#[derive(Clone)]
pub struct Page {
    cmd_tx: Sender<Command>,
}

impl Browser {
    /// Launch Chrome (spawns a background thread that owns the engine).
    pub async fn new(config: Option<EngineConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        Self::spawn(move || cdp::CdpEngine::new(config)).await
    }

    /// Run `launch` on a fresh worker thread and drive the engine it returns.
    ///
    /// The engine never leaves the worker, so it does not need to be `Send`.
    pub async fn spawn<E, F>(launch: F) -> Result<Self>
    where
        E: Engine + 'static,
        F: FnOnce() -> Result<E> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::Builder::new()
            .name("website2pdf-browser".into())
            .spawn(move || {
                let mut engine = match launch() {
                    Ok(e) => e,
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                };

                let _ = init_tx.send(Ok(()));

                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        Command::Goto(url, resp) => {
                            let _ = resp.send(engine.load_url(&url));
                        }
                        Command::ContentHeight(resp) => {
                            let _ = resp.send(engine.content_height());
                        }
                        Command::Pdf(options, resp) => {
                            let _ = resp.send(engine.print_pdf(&options));
                        }
                        Command::Close(resp) => {
                            let res = engine.close();
                            // Later sends must fail before the caller sees the reply.
                            drop(cmd_rx);
                            let _ = resp.send(res);
                            return;
                        }
                    }
                }
            })
            .map_err(|e| Error::InitializationError(format!("Failed to spawn browser worker: {}", e)))?;

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Page handle backed by the same worker thread.
    pub async fn new_page(&self) -> Result<Page> {
        Ok(Page {
            cmd_tx: self.cmd_tx.clone(),
        })
    }

    /// Shutdown the background worker and close the browser.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        send(&self.cmd_tx, Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}

impl Page {
    /// Navigate to a URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        send(&self.cmd_tx, Command::Goto(url.to_string(), tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Goto canceled: {}", e)))?
    }

    /// Rendered height of the document body in CSS pixels
    pub async fn content_height(&self) -> Result<f64> {
        let (tx, rx) = oneshot::channel();
        send(&self.cmd_tx, Command::ContentHeight(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("ContentHeight canceled: {}", e)))?
    }

    /// Print the current page to PDF
    pub async fn pdf(&self, options: PdfOptions) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        send(&self.cmd_tx, Command::Pdf(options, tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Pdf canceled: {}", e)))?
    }
}

fn send(tx: &Sender<Command>, cmd: Command) -> Result<()> {
    tx.send(cmd)
        .map_err(|_| Error::Other("Browser worker has shut down".into()))
}
