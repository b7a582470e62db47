use std::io;

use thiserror::Error;

use beseech_spec::SchemaError;

/// Failures that abort a prompt sequence.
///
/// Validation rejections never appear here; they re-prompt the same leaf.
/// An interrupt signal terminates the process directly and is never routed
/// through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure on the underlying input or output stream. No partial
    /// result is delivered.
    #[error("stream error: {0}")]
    Io(#[from] io::Error),

    /// The input stream closed before a full line was read.
    #[error("input stream closed before a line was read")]
    Eof,

    /// Schema configuration problem, surfaced unchanged to the caller.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
