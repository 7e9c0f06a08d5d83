//! Named axis locations (STAT axis value formats 1 to 4).

use indexmap::IndexMap;

use crate::{flags::Flags, name::NameRecord};

/// A single named stop on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFormat1 {
    pub name: NameRecord,
    pub value: f64,
    pub flags: Flags,
}

/// A named stop covering a range of values on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFormat2 {
    pub name: NameRecord,
    /// Nominal value.
    pub value: f64,
    /// `(min, max)`
    pub range: (f64, f64),
    pub flags: Flags,
}

/// A named stop linked to another stop on the same axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFormat3 {
    pub name: NameRecord,
    pub value: f64,
    pub linked_value: f64,
    pub flags: Flags,
}

/// A named location spanning every axis of the Stylespace.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFormat4 {
    pub name: NameRecord,
    /// Axis name to coordinate.
    pub axis_values: IndexMap<String, f64>,
    pub flags: Flags,
}

impl LocationFormat4 {
    pub fn new(
        name: impl Into<NameRecord>,
        axis_values: impl IntoIterator<Item = (impl Into<String>, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            axis_values: axis_values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            flags: Flags::default(),
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }
}

/// A location declared on a single axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisLocation {
    Format1(LocationFormat1),
    Format2(LocationFormat2),
    Format3(LocationFormat3),
}

impl AxisLocation {
    /// A format 1 stop.
    pub fn stop(name: impl Into<NameRecord>, value: f64) -> Self {
        Self::Format1(LocationFormat1 {
            name: name.into(),
            value,
            flags: Flags::default(),
        })
    }

    /// A format 2 stop covering `min..=max`.
    pub fn range(name: impl Into<NameRecord>, value: f64, min: f64, max: f64) -> Self {
        Self::Format2(LocationFormat2 {
            name: name.into(),
            value,
            range: (min, max),
            flags: Flags::default(),
        })
    }

    /// A format 3 stop linked to `linked_value`.
    pub fn linked(name: impl Into<NameRecord>, value: f64, linked_value: f64) -> Self {
        Self::Format3(LocationFormat3 {
            name: name.into(),
            value,
            linked_value,
            flags: Flags::default(),
        })
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        match &mut self {
            Self::Format1(l) => l.flags = flags,
            Self::Format2(l) => l.flags = flags,
            Self::Format3(l) => l.flags = flags,
        }
        self
    }

    /// STAT axis value table format.
    pub fn format(&self) -> u16 {
        match self {
            Self::Format1(_) => 1,
            Self::Format2(_) => 2,
            Self::Format3(_) => 3,
        }
    }

    pub fn name(&self) -> &NameRecord {
        match self {
            Self::Format1(l) => &l.name,
            Self::Format2(l) => &l.name,
            Self::Format3(l) => &l.name,
        }
    }

    /// The stop value (the nominal value for ranges).
    pub fn value(&self) -> f64 {
        match self {
            Self::Format1(l) => l.value,
            Self::Format2(l) => l.value,
            Self::Format3(l) => l.value,
        }
    }

    pub fn flags(&self) -> &Flags {
        match self {
            Self::Format1(l) => &l.flags,
            Self::Format2(l) => &l.flags,
            Self::Format3(l) => &l.flags,
        }
    }

    pub fn linked_value(&self) -> Option<f64> {
        match self {
            Self::Format3(l) => Some(l.linked_value),
            _ => None,
        }
    }
}
