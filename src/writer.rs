//! Per-batch sink writer
//!
//! Owns one [`RecordBuffer`] and one [`DeliveryEngine`] and enforces the batch
//! lifecycle: rows are accepted while `Open`; `close` materializes the
//! artifact, sends the email, and ends in `Closed` or `Failed`.

use crate::buffer::RecordBuffer;
use crate::config::EmailSinkConfig;
use crate::delivery::{DeliveryEngine, Relay, SmtpRelay};
use crate::error::{Error, Result};
use crate::types::{BatchState, Row, RowType};
use tracing::{debug, info, warn};

/// Writer lifecycle as seen by a host pipeline
///
/// The host calls [`write`](SinkWriter::write) any number of times followed by
/// exactly one [`close`](SinkWriter::close).
pub trait SinkWriter {
    /// Accept one record
    fn write(&mut self, row: &Row) -> Result<()>;

    /// Finish the batch
    fn close(&mut self) -> Result<()>;
}

/// Writer that mails the batch as a CSV attachment on close
#[derive(Debug)]
pub struct EmailSinkWriter<R = SmtpRelay> {
    buffer: RecordBuffer,
    engine: DeliveryEngine<R>,
    state: BatchState,
}

impl EmailSinkWriter<SmtpRelay> {
    /// Create a writer for rows of `row_type`, delivering over SMTP
    ///
    /// The configuration is validated here so misconfiguration fails before any
    /// record is accepted.
    pub fn new(row_type: RowType, config: EmailSinkConfig) -> Result<Self> {
        config.validate()?;
        let relay = SmtpRelay::from_config(&config);
        Ok(Self::with_relay(row_type, config, relay))
    }
}

impl<R: Relay> EmailSinkWriter<R> {
    /// Create a writer delivering through a caller-supplied relay
    ///
    /// Unlike [`EmailSinkWriter::new`] this does not validate `config`.
    pub fn with_relay(row_type: RowType, config: EmailSinkConfig, relay: R) -> Self {
        let buffer = RecordBuffer::new(row_type, config.csv_quoting);
        Self {
            buffer,
            engine: DeliveryEngine::new(config, relay),
            state: BatchState::Open,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Number of records accepted so far
    pub fn records(&self) -> usize {
        self.buffer.len()
    }

    /// The relay used for delivery
    pub fn relay(&self) -> &R {
        self.engine.relay()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == BatchState::Open {
            Ok(())
        } else {
            Err(Error::BatchClosed { state: self.state })
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(state = %self.state, error = %error, "batch failed");
        self.state = BatchState::Failed;
        error
    }

    /// Encode and buffer one row
    ///
    /// An encoding failure aborts the batch.
    pub fn write(&mut self, row: &Row) -> Result<()> {
        self.ensure_open()?;
        match self.buffer.append(row) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Materialize the artifact and send it
    ///
    /// Blocks for the file write and the full SMTP exchange. Any failure is
    /// terminal and leaves the writer `Failed`.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        debug!(records = self.buffer.len(), "closing batch");

        self.state = BatchState::Materializing;
        if let Err(e) = self.engine.materialize(self.buffer.as_str()) {
            return Err(self.fail(e.into()));
        }

        self.state = BatchState::Sending;
        if let Err(e) = self.engine.deliver() {
            return Err(self.fail(e));
        }

        self.state = BatchState::Closed;
        info!(records = self.buffer.len(), "batch delivered");
        Ok(())
    }
}

impl<R: Relay> SinkWriter for EmailSinkWriter<R> {
    fn write(&mut self, row: &Row) -> Result<()> {
        EmailSinkWriter::write(self, row)
    }

    fn close(&mut self) -> Result<()> {
        EmailSinkWriter::close(self)
    }
}
