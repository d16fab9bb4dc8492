//! Error types for the command-line surface.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::error::{GenerationError, SchemaError};

/// Errors surfaced by the `xsd-sample` command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The schema could not be loaded.
    #[error("schema error: {source}")]
    Schema {
        /// Underlying schema error.
        #[from]
        #[source]
        source: SchemaError,
    },
    /// Generation failed.
    #[error("generation failed: {source}")]
    Generation {
        /// Underlying generation error.
        #[from]
        #[source]
        source: GenerationError,
    },
    /// An output file could not be written.
    #[error("failed to write '{path}': {message}")]
    WriteError {
        /// Path that could not be written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// The run report could not be encoded as JSON.
    #[error("failed to encode generation report: {message}")]
    ReportEncoding {
        /// Encoder error message.
        message: String,
    },
}
