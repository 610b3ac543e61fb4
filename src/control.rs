//! Operator signals for the frame loop: quit and snapshot.
//!
//! Polled once per frame with a bounded wait. Keyboard input arrives one
//! command per line on stdin (`q` quits, `s` takes a snapshot); Ctrl-C quits.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Out-of-band operator request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSignal {
    /// Stop the loop
    Quit,
    /// Save the last rendered frame
    Snapshot,
}

/// Source of operator signals
pub trait ControlInput {
    /// Wait at most `wait` for a signal.
    fn poll(&mut self, wait: Duration) -> Option<ControlSignal>;
}

/// Map one line of keyboard input to a signal.
pub fn parse_key(line: &str) -> Option<ControlSignal> {
    match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('q') => Some(ControlSignal::Quit),
        Some('s') => Some(ControlSignal::Snapshot),
        _ => None,
    }
}

/// Set up a Ctrl-C handler that clears the returned flag.
pub fn setup_ctrl_c_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(format!("Ctrl-C handler: {}", e))))?;
    Ok(running)
}

/// Ctrl-C flag plus optional keyboard reader
pub struct SignalControl {
    running: Arc<AtomicBool>,
    keyboard: Option<Receiver<ControlSignal>>,
}

impl SignalControl {
    /// Watch only the run flag.
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self {
            running,
            keyboard: None,
        }
    }

    /// Also read commands from stdin on a background thread.
    ///
    /// The reader thread is detached; it ends when stdin closes or the
    /// control is dropped and the next line fails to send.
    pub fn with_keyboard(mut self) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("keyboard".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if let Some(signal) = parse_key(&line) {
                        if tx.send(signal).is_err() {
                            break;
                        }
                    }
                }
            })?;
        self.keyboard = Some(rx);
        Ok(self)
    }
}

impl ControlInput for SignalControl {
    fn poll(&mut self, wait: Duration) -> Option<ControlSignal> {
        if !self.running.load(Ordering::SeqCst) {
            return Some(ControlSignal::Quit);
        }

        match &self.keyboard {
            Some(rx) => match rx.recv_timeout(wait) {
                Ok(signal) => return Some(signal),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("Keyboard input closed");
                    self.keyboard = None;
                }
            },
            None => thread::sleep(wait),
        }

        if !self.running.load(Ordering::SeqCst) {
            return Some(ControlSignal::Quit);
        }
        None
    }
}

/// Replays a fixed sequence of poll results; `None` once exhausted
#[derive(Debug, Default)]
pub struct ScriptedControl {
    steps: VecDeque<Option<ControlSignal>>,
}

impl ScriptedControl {
    /// Build from per-poll results
    pub fn new<I: IntoIterator<Item = Option<ControlSignal>>>(steps: I) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Never signals
    pub fn idle() -> Self {
        Self::default()
    }
}

impl ControlInput for ScriptedControl {
    fn poll(&mut self, _wait: Duration) -> Option<ControlSignal> {
        self.steps.pop_front().flatten()
    }
}
