//! Async scan dialog driver
//!
//! Runs a [`ScanSession`] on its own task, fed by key events from the UI.
//! Completed scans are delivered after the settle delay, at which point the
//! dialog is considered closed and the session stops listening.

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};

use super::session::{manual_entry, ScanSession};
use crate::{
    config::ScannerConfig,
    models::scan::{Key, KeyEvent, ScanDisplay},
};

/// Messages from the hosting dialog
#[derive(Debug, Clone)]
pub enum ScanInput {
    Key(KeyEvent),
    Manual(String),
    Open,
    Close,
}

/// UI-side handle to a running listener
pub struct ScanHandle {
    input: mpsc::Sender<ScanInput>,
    scans: mpsc::Receiver<String>,
    display: watch::Receiver<ScanDisplay>,
    started: Instant,
    task: JoinHandle<()>,
}

impl ScanHandle {
    /// Key event stamped with the time elapsed since the listener started
    pub async fn press(&self, key_name: &str) -> bool {
        let timestamp_ms = self.started.elapsed().as_millis() as u64;
        self.send(ScanInput::Key(KeyEvent::new(Key::from_name(key_name), timestamp_ms)))
            .await
    }

    pub async fn send(&self, input: ScanInput) -> bool {
        self.input.send(input).await.is_ok()
    }

    /// Next delivered barcode; `None` once the listener has shut down
    pub async fn next_scan(&mut self) -> Option<String> {
        self.scans.recv().await
    }

    pub fn display(&self) -> ScanDisplay {
        self.display.borrow().clone()
    }

    /// Stop feeding input and wait for pending deliveries to finish
    pub async fn shutdown(self) -> Vec<String> {
        let ScanHandle {
            input,
            mut scans,
            task,
            ..
        } = self;
        drop(input);
        let _ = task.await;
        let mut rest = Vec::new();
        while let Ok(barcode) = scans.try_recv() {
            rest.push(barcode);
        }
        rest
    }
}

pub struct ScanListener {
    session: ScanSession,
    settle: Duration,
    input: mpsc::Receiver<ScanInput>,
    scans: mpsc::Sender<String>,
    display: watch::Sender<ScanDisplay>,
}

impl ScanListener {
    /// Spawn a listener on the current runtime
    pub fn spawn(config: &ScannerConfig) -> ScanHandle {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (scans_tx, scans_rx) = mpsc::channel(16);
        let (display_tx, display_rx) = watch::channel(ScanDisplay::Waiting);

        let listener = ScanListener {
            session: ScanSession::new(config),
            settle: config.settle_delay(),
            input: input_rx,
            scans: scans_tx,
            display: display_tx,
        };

        ScanHandle {
            input: input_tx,
            scans: scans_rx,
            display: display_rx,
            started: Instant::now(),
            task: tokio::spawn(listener.run()),
        }
    }

    async fn run(mut self) {
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<String>();
        let mut pending = 0usize;
        let mut input_open = true;

        while input_open || pending > 0 {
            tokio::select! {
                msg = self.input.recv(), if input_open => match msg {
                    Some(msg) => {
                        if let Some(barcode) = self.handle(msg).await {
                            pending += 1;
                            let settled_tx = settled_tx.clone();
                            let settle = self.settle;
                            tokio::spawn(async move {
                                tokio::time::sleep(settle).await;
                                let _ = settled_tx.send(barcode);
                            });
                        }
                    }
                    None => input_open = false,
                },
                Some(barcode) = settled_rx.recv(), if pending > 0 => {
                    pending -= 1;
                    self.deliver(barcode).await;
                }
            }
        }
        tracing::debug!("Scan listener finished");
    }

    /// Returns a barcode that still has to wait out the settle delay
    async fn handle(&mut self, msg: ScanInput) -> Option<String> {
        match msg {
            ScanInput::Key(event) => {
                let completed = self.session.on_key_event(&event.key, event.timestamp_ms)?;
                self.display.send_replace(self.session.display().clone());
                Some(completed.barcode)
            }
            ScanInput::Manual(text) => {
                if !self.session.is_active() {
                    tracing::debug!("Manual entry ignored, scan dialog is closed");
                    return None;
                }
                if let Some(barcode) = manual_entry(&text) {
                    self.display
                        .send_replace(ScanDisplay::Scanned(barcode.clone()));
                    self.deliver(barcode).await;
                }
                None
            }
            ScanInput::Open => {
                self.session.reset();
                self.display.send_replace(ScanDisplay::Waiting);
                None
            }
            ScanInput::Close => {
                self.session.stop();
                None
            }
        }
    }

    async fn deliver(&mut self, barcode: String) {
        self.session.stop();
        if self.scans.send(barcode).await.is_err() {
            tracing::warn!("Scan consumer went away before delivery");
        }
    }
}
