//! Error types for Stylespace construction.

use std::{io, path::PathBuf, result};

/// Structural and validation errors raised while building a Stylespace.
///
/// Construction stops at the first violation; no partial Stylespace is
/// ever returned.
#[derive(Debug, thiserror::Error)]
pub enum StylespaceError {
    /// A NameRecord without an `en` entry.
    #[error(
        "All NameRecords must have a default English (IETF BCP 47 language code 'en') entry."
    )]
    MissingDefaultName,

    /// A name that is neither a string nor a language map.
    #[error("Don't know how to construct NameRecord from '{0}'.")]
    InvalidNameRecord(String),

    /// A flag name that is not an axis value flag.
    #[error("unknown axis value flag '{flag}' in {context}")]
    UnknownFlag {
        flag: String,
        context: String,
    },

    /// A required key is absent.
    #[error("missing required key '{key}' in {context}")]
    MissingKey {
        key: &'static str,
        context: String,
    },

    /// A value of the wrong plist type.
    #[error("expected {expected} for '{key}' in {context}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
        context: String,
    },

    /// A `range` with fewer than two values.
    #[error("Not enough values to unpack the range of {context} (expected 2, got {actual})")]
    RangeTooShort {
        context: String,
        actual: usize,
    },

    /// A `range` with more than two values.
    #[error("Too many values to unpack the range of {context} (expected 2, got {actual})")]
    RangeTooLong {
        context: String,
        actual: usize,
    },

    /// An axis tag that is not four printable ASCII characters.
    #[error("axis tag '{0}' must be exactly 4 printable ASCII characters")]
    InvalidTag(String),

    /// Orderings given for some axes only.
    #[error(
        "If you specify the ordering for one axis, you must specify all of them and they must \
         be >= 0."
    )]
    PartialOrdering,

    /// An axis ordering outside the 16-bit unsigned range.
    #[error("ordering {ordering} of axis '{axis}' must be between 0 and 65535")]
    OrderingOutOfRange {
        axis: String,
        ordering: i64,
    },

    /// A named location that does not cover exactly the Stylespace axes.
    #[error(
        "Location named '{0}' must specify values for all axes in the Stylespace and contain no \
         other axis names."
    )]
    IncompleteNamedLocation(String),

    /// Names supplied in differing language sets.
    #[error(
        "All names must be supplied in the same languages. {subject} is named in languages \
         {actual:?} but expected was {expected:?}."
    )]
    LanguageMismatch {
        subject: String,
        actual: Vec<String>,
        expected: Vec<String>,
    },

    /// A linked value with no matching value on its axis.
    #[error(
        "On axis '{axis}', location '{location}' specifies a linked_value of '{linked_value:?}', \
         which does not exist on that axis (ranges are ignored)."
    )]
    MissingLinkedValue {
        axis: String,
        location: String,
        linked_value: f64,
    },

    /// Two locations with the same value on one axis.
    #[error(
        "On axis '{axis}', location '{location}' specifies a duplicate location value of \
         '{value:?}', which is already assigned on the same axis."
    )]
    DuplicateValue {
        axis: String,
        location: String,
        value: f64,
    },

    /// Two named locations at the same coordinates.
    #[error("The named location '{0}' specifies a duplicate location already taken by another.")]
    DuplicateNamedLocation(String),

    /// A designspace lib with both or neither Stylespace keys.
    #[error(
        "Designspace lib must contain EITHER inline Stylespace data OR a path to an external \
         Stylespace file."
    )]
    AmbiguousDesignspaceReference,

    /// A relative Stylespace path without a document to resolve it against.
    #[error(
        "Designspace document has no known location, but the Stylespace path '{0}' is relative \
         to it."
    )]
    UnknownDocumentLocation(PathBuf),

    /// Failed to read or write a file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    /// Malformed property list.
    #[error("failed to parse plist: {0}")]
    Plist(#[from] plist::Error),

    /// Failed to load a designspace document.
    #[error("failed to load designspace '{path}': {message}")]
    Designspace {
        path: PathBuf,
        message: String,
    },
}

pub type Result<T> = result::Result<T, StylespaceError>;
