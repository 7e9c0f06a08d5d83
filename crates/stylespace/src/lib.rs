//! # Stylespace
//!
//! A typed, validated description of the style axes of a font family and the
//! named locations on them, used to generate an OpenType `STAT` table.
//!
//! ## Example
//!
//! ```no_run
//! use statmake_stylespace::Stylespace;
//!
//! let stylespace = Stylespace::from_file("Family.stylespace").unwrap();
//! for axis in stylespace.axes() {
//!     println!("{} ({}): {} locations", axis.name.default(), axis.tag, axis.locations.len());
//! }
//! ```

mod axis;
mod designspace;
mod error;
mod flags;
mod location;
mod name;
mod structure;
mod stylespace;

pub use axis::Axis;
pub use designspace::{
    ADDITIONAL_LOCATIONS_KEY, AdditionalLocations, DesignspaceLib, STYLESPACE_INLINE_KEY,
    STYLESPACE_PATH_KEY, additional_locations,
};
pub use error::{Result, StylespaceError};
pub use flags::{AxisValueFlag, Flags};
pub use location::{
    AxisLocation, LocationFormat1, LocationFormat2, LocationFormat3, LocationFormat4,
};
pub use name::NameRecord;
pub use stylespace::{DEFAULT_ELIDED_FALLBACK_NAME_ID, ElidedFallback, Stylespace};
