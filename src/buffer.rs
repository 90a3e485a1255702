//! In-memory record accumulation
//!
//! Each accepted row becomes one line: field texts joined by [`DELIMITER`],
//! no trailing delimiter, terminated by `\n`. No I/O happens here.

use crate::config::CsvQuoting;
use crate::error::RecordEncodingError;
use crate::types::{Row, RowType};
use tracing::debug;

/// Field delimiter
pub const DELIMITER: char = ',';

/// Record terminator
pub const LINE_TERMINATOR: char = '\n';

/// Accumulates encoded rows for one batch
///
/// Invariant: the buffer holds exactly one `\n`-terminated line per accepted
/// row, in insertion order. A row that fails to encode leaves it untouched.
#[derive(Debug)]
pub struct RecordBuffer {
    row_type: RowType,
    quoting: CsvQuoting,
    buffer: String,
    records: usize,
}

impl RecordBuffer {
    /// Create an empty buffer for rows of `row_type`
    pub fn new(row_type: RowType, quoting: CsvQuoting) -> Self {
        Self {
            row_type,
            quoting,
            buffer: String::new(),
            records: 0,
        }
    }

    /// Encode `row` and append it as one line
    ///
    /// # Errors
    ///
    /// - [`RecordEncodingError::ArityMismatch`] if the row's field count differs
    ///   from the row type
    /// - [`RecordEncodingError::NullField`] if a field has no text form
    pub fn append(&mut self, row: &Row) -> Result<(), RecordEncodingError> {
        let line = encode_row(&self.row_type, row, self.quoting)?;
        self.buffer.push_str(&line);
        self.buffer.push(LINE_TERMINATOR);
        self.records += 1;
        debug!(records = self.records, bytes = self.buffer.len(), "record buffered");
        Ok(())
    }

    /// Number of records accepted so far
    pub fn len(&self) -> usize {
        self.records
    }

    /// Whether no record has been accepted
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// The accumulated text
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Hand the accumulated text over, consuming the buffer
    pub fn into_inner(self) -> String {
        self.buffer
    }
}

/// Encode one row into a line without its terminator
///
/// A zero-field row (arity 0) encodes to the empty string.
pub fn encode_row(
    row_type: &RowType,
    row: &Row,
    quoting: CsvQuoting,
) -> Result<String, RecordEncodingError> {
    if row.arity() != row_type.arity() {
        return Err(RecordEncodingError::ArityMismatch {
            expected: row_type.arity(),
            actual: row.arity(),
        });
    }

    let mut line = String::new();
    for (index, value) in row.fields().iter().enumerate() {
        let text = value
            .to_text()
            .ok_or_else(|| RecordEncodingError::NullField {
                index,
                name: row_type.field_name(index),
            })?;
        if index > 0 {
            line.push(DELIMITER);
        }
        push_field(&mut line, &text, quoting);
    }
    Ok(line)
}

fn push_field(line: &mut String, text: &str, quoting: CsvQuoting) {
    match quoting {
        CsvQuoting::None => line.push_str(text),
        CsvQuoting::Rfc4180 => {
            if text.contains([DELIMITER, '"', '\r', '\n']) {
                line.push('"');
                line.push_str(&text.replace('"', "\"\""));
                line.push('"');
            } else {
                line.push_str(text);
            }
        }
    }
}
