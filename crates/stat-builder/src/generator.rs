//! Reconcile a Stylespace with a font and derive the STAT records.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use log::{debug, info};
use ordered_float::OrderedFloat;
use read_fonts::types::{Fixed, NameId, Tag};
use statmake_stylespace::{AdditionalLocations, Axis, AxisLocation, ElidedFallback, Stylespace};

use crate::{
    error::{Error, Result},
    font::VariableFont,
    names::{NameAllocator, NameTable},
};

/// A coordinate at `fvar` precision (16.16 fixed).
type Stop = OrderedFloat<f64>;

fn stop(value: f64) -> Stop {
    OrderedFloat(Fixed::from_f64(value).to_f64())
}

/// STAT table minor version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatVersion {
    /// 1.1, the base revision.
    V1_1,
    /// 1.2, required by format 4 axis values.
    V1_2,
}

impl StatVersion {
    pub fn minor(self) -> u16 {
        match self {
            Self::V1_1 => 1,
            Self::V1_2 => 2,
        }
    }
}

impl fmt::Display for StatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1.{}", self.minor())
    }
}

/// A design axis record.
#[derive(Debug, Clone, PartialEq)]
pub struct StatAxis {
    pub tag: Tag,
    pub name_id: NameId,
    pub ordering: u16,
}

/// An axis value record, one variant per STAT format.
#[derive(Debug, Clone, PartialEq)]
pub enum StatAxisValue {
    Format1 {
        axis_index: u16,
        flags: u16,
        name_id: NameId,
        value: f64,
    },
    Format2 {
        axis_index: u16,
        flags: u16,
        name_id: NameId,
        nominal: f64,
        min: f64,
        max: f64,
    },
    Format3 {
        axis_index: u16,
        flags: u16,
        name_id: NameId,
        value: f64,
        linked_value: f64,
    },
    /// `(axis index, value)` pairs sorted by axis index.
    Format4 {
        flags: u16,
        name_id: NameId,
        values: Vec<(u16, f64)>,
    },
}

impl StatAxisValue {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format1 { .. } => 1,
            Self::Format2 { .. } => 2,
            Self::Format3 { .. } => 3,
            Self::Format4 { .. } => 4,
        }
    }

    pub fn name_id(&self) -> NameId {
        match self {
            Self::Format1 { name_id, .. }
            | Self::Format2 { name_id, .. }
            | Self::Format3 { name_id, .. }
            | Self::Format4 { name_id, .. } => *name_id,
        }
    }

    pub fn flags(&self) -> u16 {
        match self {
            Self::Format1 { flags, .. }
            | Self::Format2 { flags, .. }
            | Self::Format3 { flags, .. }
            | Self::Format4 { flags, .. } => *flags,
        }
    }
}

/// Everything needed to write new `STAT` and `name` tables.
#[derive(Debug, Clone)]
pub struct GeneratedStat {
    pub version: StatVersion,
    pub axes: Vec<StatAxis>,
    pub values: Vec<StatAxisValue>,
    pub elided_fallback_name_id: NameId,
    /// The font's name table plus all names the records refer to.
    pub names: NameTable,
}

impl GeneratedStat {
    fn name(&self, name_id: NameId) -> &str {
        self.names.debug_name(name_id.to_u16()).unwrap_or("?")
    }
}

impl fmt::Display for GeneratedStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STAT version {}", self.version)?;
        for axis in &self.axes {
            writeln!(
                f,
                "  axis '{}' name {} \"{}\" ordering {}",
                axis.tag,
                axis.name_id.to_u16(),
                self.name(axis.name_id),
                axis.ordering
            )?;
        }
        for value in &self.values {
            let name = self.name(value.name_id());
            write!(f, "  format {} \"{name}\" flags {:#06x}: ", value.format(), value.flags())?;
            match value {
                StatAxisValue::Format1 { axis_index, value, .. } => {
                    writeln!(f, "axis {axis_index} value {value}")?
                }
                StatAxisValue::Format2 { axis_index, nominal, min, max, .. } => {
                    writeln!(f, "axis {axis_index} nominal {nominal} range {min}..={max}")?
                }
                StatAxisValue::Format3 { axis_index, value, linked_value, .. } => {
                    writeln!(f, "axis {axis_index} value {value} linked {linked_value}")?
                }
                StatAxisValue::Format4 { values, .. } => {
                    let values: Vec<String> =
                        values.iter().map(|(index, value)| format!("{index}={value}")).collect();
                    writeln!(f, "{}", values.join(", "))?
                }
            }
        }
        write!(
            f,
            "  elided fallback name {} \"{}\"",
            self.elided_fallback_name_id.to_u16(),
            self.name(self.elided_fallback_name_id)
        )
    }
}

/// How one Stylespace axis maps onto the output.
struct ResolvedAxis<'a> {
    axis: &'a Axis,
    tag: Tag,
    index: u16,
    /// Name ID of the `fvar` axis, for axes present in the font.
    font_name_id: Option<NameId>,
}

/// Generate STAT records for `font`.
///
/// `additional_locations` pins the font on Stylespace axes it does not
/// contain. The font's name table is copied; names are added to the copy only.
pub fn generate(
    stylespace: &Stylespace,
    font: &impl VariableFont,
    additional_locations: &AdditionalLocations,
) -> Result<GeneratedStat> {
    check_additional_axes(stylespace, additional_locations)?;
    let axes = reconcile_axes(stylespace, font, additional_locations)?;
    let used_stops = collect_used_stops(stylespace, font, additional_locations, &axes)?;

    let mut names = NameAllocator::new(font.name_table().clone());

    let mut stat_axes = Vec::with_capacity(axes.len());
    for resolved in axes.values() {
        let name_id = match resolved.font_name_id {
            Some(name_id) => name_id,
            None => names.name_id(&resolved.axis.name)?,
        };
        let ordering = resolved
            .axis
            .ordering
            .ok_or_else(|| Error::UnresolvedOrdering(resolved.axis.name.default().to_string()))?;
        stat_axes.push(StatAxis {
            tag: resolved.tag,
            name_id,
            ordering,
        });
    }

    let mut values = Vec::new();
    for axis in stylespace.axes() {
        let Some(resolved) = axes.get(axis.name.default()) else {
            continue;
        };
        let Some(stops) = used_stops.get(&resolved.tag) else {
            continue;
        };
        for location in &axis.locations {
            if stops.contains(&stop(location.value())) {
                values.push(axis_value(location, resolved.index, &mut names)?);
            }
        }
    }

    let mut version = StatVersion::V1_1;
    for location in stylespace.locations() {
        let mut records = Vec::with_capacity(location.axis_values.len());
        for (axis_name, value) in &location.axis_values {
            let used = axes.get(axis_name.as_str()).and_then(|resolved| {
                let stops = used_stops.get(&resolved.tag)?;
                stops.contains(&stop(*value)).then_some((resolved.index, *value))
            });
            match used {
                Some(record) => records.push(record),
                None => break,
            }
        }
        if records.len() != location.axis_values.len() {
            debug!("Dropping named location '{}' not used by this font", location.name.default());
            continue;
        }
        records.sort_by_key(|(index, _)| *index);
        values.push(StatAxisValue::Format4 {
            flags: location.flags.bits(),
            name_id: names.name_id(&location.name)?,
            values: records,
        });
        version = StatVersion::V1_2;
    }

    let elided_fallback_name_id = elided_fallback(stylespace.elided_fallback(), &mut names)?;

    info!(
        "Generated STAT {version} with {} axes and {} axis values",
        stat_axes.len(),
        values.len()
    );
    Ok(GeneratedStat {
        version,
        axes: stat_axes,
        values,
        elided_fallback_name_id,
        names: names.into_table(),
    })
}

/// Additional locations may only name Stylespace axes.
fn check_additional_axes(
    stylespace: &Stylespace,
    additional_locations: &AdditionalLocations,
) -> Result<()> {
    let unknown: Vec<&str> = additional_locations
        .keys()
        .map(String::as_str)
        .filter(|name| stylespace.axis(name).is_none())
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::UnknownAdditionalAxes(unknown.join(", ")))
    }
}

/// Match font axes and additional locations to Stylespace axes by name.
///
/// Font axes come first in `fvar` order, then additional axes.
fn reconcile_axes<'a>(
    stylespace: &'a Stylespace,
    font: &impl VariableFont,
    additional_locations: &AdditionalLocations,
) -> Result<IndexMap<&'a str, ResolvedAxis<'a>>> {
    let mut axes: IndexMap<&str, ResolvedAxis> = IndexMap::new();

    for font_axis in font.axes() {
        let name = font
            .english_name(font_axis.name_id)
            .ok_or(Error::MissingEnglishName(u32::from(font_axis.name_id.to_u16())))?;
        let axis = stylespace
            .axis(name)
            .ok_or_else(|| Error::AxisNotInStylespace(name.to_string()))?;
        let font_tag = font_axis.tag.to_string();
        if font_tag != axis.tag {
            return Err(Error::TagMismatch {
                name: name.to_string(),
                font_tag,
                stylespace_tag: axis.tag.clone(),
            });
        }
        let index = axes.len() as u16;
        axes.insert(
            axis.name.default(),
            ResolvedAxis {
                axis,
                tag: font_axis.tag,
                index,
                font_name_id: Some(font_axis.name_id),
            },
        );
    }

    for name in additional_locations.keys() {
        let axis = stylespace
            .axis(name)
            .ok_or_else(|| Error::UnknownAdditionalAxes(name.clone()))?;
        if axes.contains_key(name.as_str()) {
            return Err(Error::RedundantAdditionalLocation(name.clone()));
        }
        let tag = Tag::new_checked(axis.tag.as_bytes())
            .map_err(|_| Error::InvalidTag(axis.tag.clone()))?;
        let index = axes.len() as u16;
        axes.insert(
            axis.name.default(),
            ResolvedAxis {
                axis,
                tag,
                index,
                font_name_id: None,
            },
        );
    }

    let missing: Vec<&str> = stylespace
        .axes()
        .iter()
        .map(|axis| axis.name.default())
        .filter(|name| !axes.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(Error::IncompleteLocation(missing.join(", ")));
    }

    Ok(axes)
}

/// Stops used by the font's instances and additional locations, per axis tag.
///
/// Every used coordinate must be declared in the Stylespace, either on the
/// axis itself or in a named location.
fn collect_used_stops(
    stylespace: &Stylespace,
    font: &impl VariableFont,
    additional_locations: &AdditionalLocations,
    axes: &IndexMap<&str, ResolvedAxis>,
) -> Result<HashMap<Tag, HashSet<Stop>>> {
    let mut declared: HashMap<Tag, HashSet<Stop>> = axes
        .values()
        .map(|resolved| (resolved.tag, resolved.axis.values().map(stop).collect()))
        .collect();
    for location in stylespace.locations() {
        for (name, value) in &location.axis_values {
            if let Some(resolved) = axes.get(name.as_str()) {
                declared.entry(resolved.tag).or_default().insert(stop(*value));
            }
        }
    }

    let mut used: HashMap<Tag, HashSet<Stop>> = HashMap::new();
    for instance in font.instances() {
        for (tag, value) in &instance.coordinates {
            let value = stop(*value);
            if !declared.get(tag).is_some_and(|stops| stops.contains(&value)) {
                return Err(Error::MissingStop {
                    axis: tag.to_string(),
                    value: value.0,
                });
            }
            used.entry(*tag).or_default().insert(value);
        }
    }

    for (name, value) in additional_locations {
        let Some(resolved) = axes.get(name.as_str()) else {
            continue;
        };
        let value = stop(*value);
        if !declared.get(&resolved.tag).is_some_and(|stops| stops.contains(&value)) {
            return Err(Error::MissingAdditionalStop {
                axis: name.clone(),
                value: value.0,
            });
        }
        used.entry(resolved.tag).or_default().insert(value);
    }

    Ok(used)
}

fn axis_value(
    location: &AxisLocation,
    axis_index: u16,
    names: &mut NameAllocator,
) -> Result<StatAxisValue> {
    let flags = location.flags().bits();
    let name_id = names.name_id(location.name())?;
    Ok(match location {
        AxisLocation::Format1(l) => StatAxisValue::Format1 {
            axis_index,
            flags,
            name_id,
            value: l.value,
        },
        AxisLocation::Format2(l) => StatAxisValue::Format2 {
            axis_index,
            flags,
            name_id,
            nominal: l.value,
            min: l.range.0,
            max: l.range.1,
        },
        AxisLocation::Format3(l) => StatAxisValue::Format3 {
            axis_index,
            flags,
            name_id,
            value: l.value,
            linked_value: l.linked_value,
        },
    })
}

/// Resolve the elided fallback name against the final name table.
fn elided_fallback(fallback: &ElidedFallback, names: &mut NameAllocator) -> Result<NameId> {
    match fallback {
        ElidedFallback::NameId(id) => {
            let name_id = u16::try_from(*id).map_err(|_| Error::MissingEnglishName(*id))?;
            match names.table().english_name(name_id) {
                Some(_) => Ok(NameId::new(name_id)),
                None => Err(Error::MissingEnglishName(*id)),
            }
        }
        ElidedFallback::Name(name) => names.name_id(name),
    }
}
