//! Command hand-off to downstream consumers.
//!
//! Every processed frame produces exactly one [`DecisionRecord`]; a sink is
//! where it goes next (motion controller, telemetry, a test harness).

use std::sync::mpsc::Sender;

use crate::decision::DecisionRecord;
use crate::error::{Error, Result};

/// Consumer of per-frame decisions
pub trait CommandSink {
    /// Deliver one decision.
    fn send(&mut self, record: &DecisionRecord) -> Result<()>;
}

/// Logs each command; the default when nothing downstream is attached
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<DecisionRecord>,
}

impl LogSink {
    /// Create a log sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandSink for LogSink {
    fn send(&mut self, record: &DecisionRecord) -> Result<()> {
        // Only log changes at info; repeats go to trace
        match self.last {
            Some(last) if last.command == record.command => {
                log::trace!("#{} {}", record.sequence, record.command);
            }
            _ => log::info!(
                "#{} {} (slice {})",
                record.sequence,
                record.command,
                record.slice_index
            ),
        }
        self.last = Some(*record);
        Ok(())
    }
}

/// Forwards decisions over an mpsc channel
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<DecisionRecord>,
}

impl ChannelSink {
    /// Wrap a channel sender
    pub fn new(tx: Sender<DecisionRecord>) -> Self {
        Self { tx }
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, record: &DecisionRecord) -> Result<()> {
        self.tx.send(*record).map_err(|_| Error::SinkClosed)
    }
}

/// Calls a closure for every decision
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(&DecisionRecord),
{
    /// Wrap a closure
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> CommandSink for CallbackSink<F>
where
    F: FnMut(&DecisionRecord),
{
    fn send(&mut self, record: &DecisionRecord) -> Result<()> {
        (self.callback)(record);
        Ok(())
    }
}
