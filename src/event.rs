use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::oracle::{self, MathOracle, OracleReply};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    /// A finished oracle call.
    Oracle { prompt: String, reply: OracleReply },
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if input_tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if input_tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for events produced outside the input thread.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Run `prompt` against `oracle` on a worker thread and post the reply to `tx`.
///
/// The reply is always delivered; failures arrive as the sentinel pair, even
/// when the oracle panics.
pub fn spawn_oracle_request(
    oracle: Arc<dyn MathOracle>,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let reply = panic::catch_unwind(AssertUnwindSafe(|| {
            oracle::solve(oracle.as_ref(), &prompt)
        }))
        .unwrap_or_else(|_| {
            tracing::error!("oracle worker panicked");
            OracleReply::sentinel()
        });
        if tx.send(AppEvent::Oracle { prompt, reply }).is_err() {
            tracing::debug!("event loop gone, dropping oracle reply");
        }
    })
}
