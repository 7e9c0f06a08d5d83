//! Stylespace axes.

use crate::{location::AxisLocation, name::NameRecord};

/// A named, tagged axis with its single-axis locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: NameRecord,
    /// Four-character axis tag (e.g., "wght", "ital")
    pub tag: String,
    pub locations: Vec<AxisLocation>,
    /// STAT axis ordering.
    ///
    /// Always `Some` once the axis is part of a [`Stylespace`](crate::Stylespace).
    pub ordering: Option<u16>,
}

impl Axis {
    pub fn new(name: impl Into<NameRecord>, tag: &str) -> Self {
        Self {
            name: name.into(),
            tag: tag.to_string(),
            locations: Vec::new(),
            ordering: None,
        }
    }

    pub fn with_locations(mut self, locations: Vec<AxisLocation>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_ordering(mut self, ordering: u16) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Values of all locations on this axis, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.locations.iter().map(AxisLocation::value)
    }
}

/// Checks that a tag is exactly four printable ASCII characters.
pub(crate) fn is_valid_tag(tag: &str) -> bool {
    tag.len() == 4 && tag.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
