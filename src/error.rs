//! This module aggregates the closed set of errors that may emerge while
//! encoding a DLIS file.

use crate::repcode::RepresentationCode;
use snafu::Snafu;
use std::io;

/// The main data type for errors raised by this library.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// A numeric value does not fit its representation code, or a
    /// configuration value (visible record length, file set number) is out
    /// of its allowed range.
    #[snafu(display("value out of range for {code:?}: {detail}"))]
    ValueOutOfRange {
        code: RepresentationCode,
        detail: String,
    },

    /// An `IDENT` contained non-ASCII bytes, or a `UNITS` value used a
    /// character outside the restricted units charset.
    #[snafu(display("charset violation in {what}: {detail}"))]
    CharsetViolation { what: &'static str, detail: String },

    /// An item was given an attribute that is not part of its set's
    /// schema, or a dictionary-controlled record is missing a required
    /// field.
    #[snafu(display("schema violation: {detail}"))]
    SchemaViolation { detail: String },

    /// No Origin item is present in the graph, or its `file_set_number`
    /// was never assigned before encoding.
    #[snafu(display("origin missing: {detail}"))]
    OriginMissing { detail: String },

    /// A FrameData row's channel values do not match the Frame's declared
    /// channel dimensions or representation codes.
    #[snafu(display("frame shape mismatch: {detail}"))]
    FrameShape { detail: String },

    /// The underlying byte sink failed.
    #[snafu(display("I/O failure while writing DLIS output"))]
    Io { source: io::Error },
}

/// Type alias for a result from this library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Io { source }
    }
}
