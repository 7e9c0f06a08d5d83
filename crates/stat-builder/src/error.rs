//! Error types for STAT generation.

use std::result;

use read_fonts::ReadError;
use statmake_stylespace::StylespaceError;
use write_fonts::{BuilderError, error};

/// Errors raised while reconciling a Stylespace with a font.
///
/// Every variant is fatal to the generation call; no partial table is
/// produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Font read error.
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    /// The font has no `fvar` table.
    #[error("Need a variable font with the fvar table to determine which instances are present.")]
    NotVariableFont,

    /// Additional locations name axes missing from the Stylespace.
    #[error(
        "Additional locations must only contain axis names that are present in the Stylespace, \
         the following aren't: {0}."
    )]
    UnknownAdditionalAxes(String),

    /// A font axis without a Stylespace entry.
    #[error(
        "Font contains axis named '{0}' which is not in Stylespace (no Stylespace entry found \
         for axis name). The Stylespace must contain all axes any font from the same family \
         contains."
    )]
    AxisNotInStylespace(String),

    /// A font axis whose tag differs from the Stylespace.
    #[error(
        "Font axis named '{name}' has tag '{font_tag}' but Stylespace defines it to be \
         '{stylespace_tag}'. Axis names and tags must match between the font and the Stylespace."
    )]
    TagMismatch {
        name: String,
        font_tag: String,
        stylespace_tag: String,
    },

    /// An additional location for an axis the font already has.
    #[error(
        "Rejecting the additional location for the axis named '{0}' because the font already \
         contains that axis. Additional locations are only for axes the font does not have."
    )]
    RedundantAdditionalLocation(String),

    /// Stylespace axes covered neither by the font nor by additional locations.
    #[error(
        "The location of the font is not fully specified, missing locations for the following \
         axes: {0}."
    )]
    IncompleteLocation(String),

    /// A named instance coordinate without a Stylespace stop.
    #[error("There is no Stylespace entry for stop {value} on the '{axis}' axis.")]
    MissingStop {
        axis: String,
        value: f64,
    },

    /// An additional location without a Stylespace stop.
    #[error(
        "There is no Stylespace entry for stop {value} on the '{axis}' axis (from additional \
         locations)."
    )]
    MissingAdditionalStop {
        axis: String,
        value: f64,
    },

    /// A name ID without a Windows English record.
    #[error("No English record for id {0} for Windows platform.")]
    MissingEnglishName(u32),

    /// A Stylespace axis without an ordering.
    #[error("axis '{0}' has no resolved ordering")]
    UnresolvedOrdering(String),

    /// An axis tag that cannot be encoded.
    #[error("axis tag '{0}' cannot be used in a font")]
    InvalidTag(String),

    /// No name ID left at or below 32767.
    #[error("no free name ID left (name IDs must not exceed 32767)")]
    NameIdOverflow,

    /// Invalid Stylespace.
    #[error(transparent)]
    Stylespace(#[from] StylespaceError),

    /// Font builder error.
    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    /// Table write error.
    #[error("failed to write table: {0}")]
    Write(#[from] error::Error),
}

pub type Result<T> = result::Result<T, Error>;
