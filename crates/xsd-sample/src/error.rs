//! Error types for the xsd-sample crate.
//!
//! This module defines semantic error enums for schema ingestion and document
//! generation, following the project's error handling conventions with
//! `thiserror`. Non-fatal conditions are not errors; they are reported as
//! [`crate::GenerationWarning`] values instead.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or interpreting a schema document.
///
/// These cover file I/O, XML well-formedness, the schema root check, and
/// malformed occurrence attributes. Every variant is fatal: no partial
/// output is produced once one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("failed to read schema file at '{path}': {message}")]
    Io {
        /// Path to the schema file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The schema text exceeds the accepted input size.
    #[error("schema document too large: {size} bytes (max {max} bytes)")]
    TooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        max: usize,
    },

    /// The schema text is not well-formed XML.
    #[error("invalid schema XML: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// The document element is not `xs:schema`.
    #[error("document element must be xs:schema, found '{found}'")]
    NotASchema {
        /// Name of the element found at the document root.
        found: String,
    },

    /// A `minOccurs` or `maxOccurs` attribute is not a valid count.
    #[error("invalid {attribute} value '{value}' on '{element}'")]
    InvalidOccurrence {
        /// Name of the declaration carrying the attribute.
        element: String,
        /// Attribute name (`minOccurs` or `maxOccurs`).
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
    },

    /// `minOccurs` is greater than a finite `maxOccurs`.
    #[error("minOccurs {min} exceeds maxOccurs {max} on '{element}'")]
    InvertedOccurrence {
        /// Name of the declaration carrying the bounds.
        element: String,
        /// Declared minimum.
        min: u32,
        /// Declared maximum.
        max: u32,
    },
}

/// Errors that can occur while generating a sample document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The requested root element is not a global element declaration.
    #[error("root element '{name}' not found among global element declarations")]
    MissingRoot {
        /// The requested root name.
        name: String,
    },

    /// The schema declares no global element to start generation from.
    #[error("schema contains no global element declaration")]
    NoGlobalElement,

    /// The schema could not be interpreted.
    #[error("schema error: {source}")]
    Schema {
        /// Underlying schema error.
        #[from]
        #[source]
        source: SchemaError,
    },

    /// The generated tree could not be written as XML text.
    #[error("failed to serialize generated document: {message}")]
    Serialization {
        /// Description of the writer error.
        message: String,
    },
}
