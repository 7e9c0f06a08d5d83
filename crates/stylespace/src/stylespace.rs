//! The Stylespace aggregate and its validation rules.

use std::collections::{BTreeSet, HashSet};

use log::debug;
use ordered_float::OrderedFloat;

use crate::{
    axis::{Axis, is_valid_tag},
    error::{Result, StylespaceError},
    location::LocationFormat4,
    name::NameRecord,
};

/// Name ID used as elided fallback name when none is given (subfamily name).
pub const DEFAULT_ELIDED_FALLBACK_NAME_ID: u32 = 2;

/// The name used when all axis value names of a style are elided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElidedFallback {
    /// An existing name table ID.
    NameId(u32),
    /// A name to add to the name table.
    Name(NameRecord),
}

impl Default for ElidedFallback {
    fn default() -> Self {
        Self::NameId(DEFAULT_ELIDED_FALLBACK_NAME_ID)
    }
}

/// Style axes and named locations of a font family.
///
/// A Stylespace is validated once on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylespace {
    axes: Vec<Axis>,
    locations: Vec<LocationFormat4>,
    elided_fallback: ElidedFallback,
}

impl Stylespace {
    /// Build and validate a Stylespace.
    ///
    /// Axis orderings are auto-assigned in declaration order when no axis
    /// specifies one.
    pub fn new(
        axes: Vec<Axis>,
        locations: Vec<LocationFormat4>,
        elided_fallback: ElidedFallback,
    ) -> Result<Self> {
        let axes = resolve_ordering(axes)?;
        let stylespace = Self {
            axes,
            locations,
            elided_fallback,
        };
        stylespace.validate()?;
        debug!(
            "Stylespace with {} axes and {} named locations",
            stylespace.axes.len(),
            stylespace.locations.len()
        );
        Ok(stylespace)
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Named locations spanning all axes (format 4).
    pub fn locations(&self) -> &[LocationFormat4] {
        &self.locations
    }

    pub fn elided_fallback(&self) -> &ElidedFallback {
        &self.elided_fallback
    }

    /// Find an axis by its default (English) name.
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.name.default() == name)
    }

    fn validate(&self) -> Result<()> {
        self.check_tags()?;
        self.check_named_location_axes()?;
        self.check_languages()?;
        self.check_linked_values()?;
        self.check_unique_values()?;
        self.check_unique_named_locations()
    }

    fn check_tags(&self) -> Result<()> {
        match self.axes.iter().find(|axis| !is_valid_tag(&axis.tag)) {
            Some(axis) => Err(StylespaceError::InvalidTag(axis.tag.clone())),
            None => Ok(()),
        }
    }

    /// Named locations must cover exactly the axes of the Stylespace.
    fn check_named_location_axes(&self) -> Result<()> {
        let available: HashSet<&str> = self.axes.iter().map(|a| a.name.default()).collect();
        for location in &self.locations {
            let used: HashSet<&str> = location.axis_values.keys().map(String::as_str).collect();
            if used != available {
                return Err(StylespaceError::IncompleteNamedLocation(
                    location.name.default().to_string(),
                ));
            }
        }
        Ok(())
    }

    /// All names must be given in the same set of languages.
    fn check_languages(&self) -> Result<()> {
        let mut named: Vec<(String, &NameRecord)> = Vec::new();
        for axis in &self.axes {
            named.push((format!("The axis '{}'", axis.name.default()), &axis.name));
            for location in &axis.locations {
                named.push((
                    format!(
                        "On axis '{}', location '{}'",
                        axis.name.default(),
                        location.name().default()
                    ),
                    location.name(),
                ));
            }
        }
        for location in &self.locations {
            named.push((
                format!("The named location '{}'", location.name.default()),
                &location.name,
            ));
        }

        let Some((_, reference)) = named.first() else {
            return Ok(());
        };
        let expected = reference.languages();
        for (subject, name) in &named[1..] {
            let actual = name.languages();
            if actual != expected {
                return Err(StylespaceError::LanguageMismatch {
                    subject: subject.clone(),
                    actual: actual.into_iter().map(str::to_string).collect(),
                    expected: expected.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        Ok(())
    }

    /// Linked values must point at another value on the same axis.
    fn check_linked_values(&self) -> Result<()> {
        for axis in &self.axes {
            let values: HashSet<OrderedFloat<f64>> = axis.values().map(OrderedFloat).collect();
            for location in &axis.locations {
                if let Some(linked_value) = location.linked_value()
                    && !values.contains(&OrderedFloat(linked_value))
                {
                    return Err(StylespaceError::MissingLinkedValue {
                        axis: axis.name.default().to_string(),
                        location: location.name().default().to_string(),
                        linked_value,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_unique_values(&self) -> Result<()> {
        for axis in &self.axes {
            let mut seen = HashSet::new();
            for location in &axis.locations {
                if !seen.insert(OrderedFloat(location.value())) {
                    return Err(StylespaceError::DuplicateValue {
                        axis: axis.name.default().to_string(),
                        location: location.name().default().to_string(),
                        value: location.value(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_unique_named_locations(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            let key: BTreeSet<(&str, OrderedFloat<f64>)> = location
                .axis_values
                .iter()
                .map(|(name, value)| (name.as_str(), OrderedFloat(*value)))
                .collect();
            if !seen.insert(key) {
                return Err(StylespaceError::DuplicateNamedLocation(
                    location.name.default().to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Fill in declaration-order orderings unless every axis specifies one.
fn resolve_ordering(axes: Vec<Axis>) -> Result<Vec<Axis>> {
    if axes.iter().all(|axis| axis.ordering.is_some()) {
        return Ok(axes);
    }
    if axes.iter().any(|axis| axis.ordering.is_some()) {
        return Err(StylespaceError::PartialOrdering);
    }
    axes.into_iter()
        .enumerate()
        .map(|(index, axis)| {
            let ordering = u16::try_from(index).map_err(|_| StylespaceError::OrderingOutOfRange {
                axis: axis.name.default().to_string(),
                ordering: index as i64,
            })?;
            Ok(Axis {
                ordering: Some(ordering),
                ..axis
            })
        })
        .collect()
}
