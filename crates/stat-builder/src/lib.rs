//! # STAT builder
//!
//! Generate the `STAT` table of a variable font from a
//! [`Stylespace`](statmake_stylespace::Stylespace).
//!
//! The Stylespace is reconciled with the font's `fvar` axes and named
//! instances: only the stops actually used by the font end up in the table,
//! and every name is added to (or found in) the font's `name` table.
//!
//! ## Example
//!
//! ```no_run
//! use stat_builder::apply_stylespace_to_variable_font;
//! use statmake_stylespace::{AdditionalLocations, Stylespace};
//!
//! let stylespace = Stylespace::from_file("Family.stylespace").unwrap();
//! let data = std::fs::read("Family[wght].ttf").unwrap();
//! let output =
//!     apply_stylespace_to_variable_font(&data, &stylespace, &AdditionalLocations::new()).unwrap();
//! std::fs::write("Family[wght].ttf", output).unwrap();
//! ```

mod apply;
mod error;
mod font;
mod generator;
mod languages;
mod names;

pub use apply::apply_stylespace_to_variable_font;
pub use error::{Error, Result};
pub use font::{FontAxis, FontSnapshot, NamedInstance, VariableFont, rewrite_font};
pub use generator::{GeneratedStat, StatAxis, StatAxisValue, StatVersion, generate};
pub use languages::{windows_language_id, windows_language_tag};
pub use names::{NameAllocator, NameEntry, NameTable};
