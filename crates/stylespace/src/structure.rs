//! Conversion between plist trees and the typed Stylespace model.
//!
//! Stylespace files are XML property lists:
//!
//! ```xml
//! <dict>
//!   <key>axes</key>
//!   <array>
//!     <dict>
//!       <key>name</key><string>Weight</string>
//!       <key>tag</key><string>wght</string>
//!       <key>locations</key>
//!       <array>
//!         <dict>
//!           <key>name</key><string>Regular</string>
//!           <key>value</key><integer>400</integer>
//!           <key>linkedValue</key><integer>700</integer>
//!           <key>flags</key><array><string>ElidableAxisValueName</string></array>
//!         </dict>
//!       </array>
//!     </dict>
//!   </array>
//! </dict>
//! ```

use std::{fs, io::Cursor, path::Path};

use indexmap::IndexMap;
use plist::{Dictionary, Value};

use crate::{
    axis::Axis,
    error::{Result, StylespaceError},
    flags::{AxisValueFlag, Flags},
    location::{AxisLocation, LocationFormat1, LocationFormat2, LocationFormat3, LocationFormat4},
    name::NameRecord,
    stylespace::{ElidedFallback, Stylespace},
};

const AXES: &str = "axes";
const LOCATIONS: &str = "locations";
const ELIDED_FALLBACK: [&str; 2] = ["elidedFallbackNameID", "elided_fallback_name_id"];
const NAME: &str = "name";
const TAG: &str = "tag";
const ORDERING: &str = "ordering";
const FLAGS: &str = "flags";
const VALUE: &str = "value";
const NOMINAL_VALUE: &str = "nominalValue";
const RANGE_MIN_VALUE: &str = "rangeMinValue";
const RANGE_MAX_VALUE: &str = "rangeMaxValue";
const RANGE: &str = "range";
const LINKED_VALUE: [&str; 2] = ["linkedValue", "linked_value"];
const LOCATION: [&str; 2] = ["location", "axis_values"];

impl Stylespace {
    /// Build a Stylespace from a parsed configuration tree.
    pub fn structure(tree: &Value) -> Result<Self> {
        let root = Fields::new(tree, "Stylespace", "the Stylespace")?;

        let axes = root
            .required_array(AXES)?
            .iter()
            .enumerate()
            .map(|(index, axis)| structure_axis(axis, index))
            .collect::<Result<Vec<_>>>()?;

        let locations = match root.array(LOCATIONS)? {
            Some(locations) => locations
                .iter()
                .enumerate()
                .map(|(index, location)| structure_named_location(location, index))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let elided_fallback = match root.any(&ELIDED_FALLBACK) {
            Some((key, value)) => elided_fallback(value, key)?,
            None => ElidedFallback::default(),
        };

        Self::new(axes, locations, elided_fallback)
    }

    /// Project back to a configuration tree using the canonical keys.
    pub fn unstructure(&self) -> Value {
        let mut root = Dictionary::new();
        root.insert(AXES.into(), Value::Array(self.axes().iter().map(unstructure_axis).collect()));
        root.insert(
            LOCATIONS.into(),
            Value::Array(self.locations().iter().map(unstructure_named_location).collect()),
        );
        let elided = match self.elided_fallback() {
            ElidedFallback::NameId(id) => Value::Integer(u64::from(*id).into()),
            ElidedFallback::Name(name) => unstructure_name(name),
        };
        root.insert(ELIDED_FALLBACK[0].into(), elided);
        Value::Dictionary(root)
    }

    /// Parse an (XML or binary) plist and build a Stylespace from it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let tree = Value::from_reader(Cursor::new(data))?;
        Self::structure(&tree)
    }

    /// Read a Stylespace plist file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| StylespaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    /// Serialize as an XML plist.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.unstructure().to_writer_xml(&mut data)?;
        Ok(data)
    }

    /// Write an XML plist file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        fs::write(path, data).map_err(|source| StylespaceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn structure_axis(tree: &Value, index: usize) -> Result<Axis> {
    let fields = Fields::new(tree, "axis", format!("axis #{index}"))?;
    let name = name_record(fields.required(NAME)?)?;
    let fields = fields.with_context(format!("axis '{}'", name.default()));

    let tag = fields.required_string(TAG)?.to_string();
    let ordering =
        fields.integer(ORDERING)?.map(|ordering| axis_ordering(ordering, &name)).transpose()?;

    let locations = match fields.array(LOCATIONS)? {
        Some(locations) => locations
            .iter()
            .map(|location| structure_axis_location(location, &name))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(Axis {
        name,
        tag,
        locations,
        ordering,
    })
}

fn axis_ordering(ordering: i64, axis: &NameRecord) -> Result<u16> {
    u16::try_from(ordering).map_err(|_| StylespaceError::OrderingOutOfRange {
        axis: axis.default().to_string(),
        ordering,
    })
}

/// Pick the location format from the keys present.
fn structure_axis_location(tree: &Value, axis: &NameRecord) -> Result<AxisLocation> {
    let fields = Fields::new(tree, "location", format!("a location on axis '{}'", axis.default()))?;
    let name = name_record(fields.required(NAME)?)?;
    let fields = fields
        .with_context(format!("location '{}' on axis '{}'", name.default(), axis.default()));
    let flags = fields.flags()?;

    if fields.contains(NOMINAL_VALUE) {
        return Ok(AxisLocation::Format2(LocationFormat2 {
            name,
            value: fields.required_number(NOMINAL_VALUE)?,
            range: (
                fields.required_number(RANGE_MIN_VALUE)?,
                fields.required_number(RANGE_MAX_VALUE)?,
            ),
            flags,
        }));
    }
    if fields.contains(RANGE) {
        let range = fields.required_array(RANGE)?;
        let bounds = range
            .iter()
            .map(|bound| number(bound).ok_or_else(|| fields.invalid(RANGE, "a list of numbers")))
            .collect::<Result<Vec<_>>>()?;
        let range = match bounds[..] {
            [min, max] => (min, max),
            _ if bounds.len() < 2 => {
                return Err(StylespaceError::RangeTooShort {
                    context: fields.context.clone(),
                    actual: bounds.len(),
                });
            }
            _ => {
                return Err(StylespaceError::RangeTooLong {
                    context: fields.context.clone(),
                    actual: bounds.len(),
                });
            }
        };
        return Ok(AxisLocation::Format2(LocationFormat2 {
            name,
            value: fields.required_number(VALUE)?,
            range,
            flags,
        }));
    }

    let value = fields.required_number(VALUE)?;
    match fields.any(&LINKED_VALUE) {
        Some((key, linked)) => Ok(AxisLocation::Format3(LocationFormat3 {
            name,
            value,
            linked_value: number(linked).ok_or_else(|| fields.invalid(key, "a number"))?,
            flags,
        })),
        None => Ok(AxisLocation::Format1(LocationFormat1 { name, value, flags })),
    }
}

fn structure_named_location(tree: &Value, index: usize) -> Result<LocationFormat4> {
    let fields = Fields::new(tree, "location", format!("named location #{index}"))?;
    let name = name_record(fields.required(NAME)?)?;
    let fields = fields.with_context(format!("named location '{}'", name.default()));

    let (key, location) = fields.any(&LOCATION).ok_or_else(|| StylespaceError::MissingKey {
        key: LOCATION[0],
        context: fields.context.clone(),
    })?;
    let location = location.as_dictionary().ok_or_else(|| fields.invalid(key, "a dictionary"))?;
    let axis_values = location
        .iter()
        .map(|(axis, value)| {
            number(value)
                .map(|value| (axis.clone(), value))
                .ok_or_else(|| fields.invalid(key, "numeric axis values"))
        })
        .collect::<Result<IndexMap<_, _>>>()?;

    Ok(LocationFormat4 {
        name,
        axis_values,
        flags: fields.flags()?,
    })
}

/// A plain string becomes an English-only record; a dictionary maps languages.
pub(crate) fn name_record(tree: &Value) -> Result<NameRecord> {
    match tree {
        Value::String(name) => Ok(NameRecord::from_string(name.clone())),
        Value::Dictionary(mapping) => {
            let pairs = mapping
                .iter()
                .map(|(language, name)| match name.as_string() {
                    Some(name) => Ok((language.clone(), name.to_string())),
                    None => Err(StylespaceError::InvalidNameRecord(format!("{tree:?}"))),
                })
                .collect::<Result<Vec<_>>>()?;
            NameRecord::new(pairs)
        }
        other => Err(StylespaceError::InvalidNameRecord(format!("{other:?}"))),
    }
}

fn flag_list(tree: &Value, context: &str) -> Result<Flags> {
    let invalid = || StylespaceError::InvalidType {
        key: FLAGS,
        expected: "a list of flag names",
        context: context.to_string(),
    };
    tree.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|flag| {
            let flag = flag.as_string().ok_or_else(invalid)?;
            flag.parse::<AxisValueFlag>().map_err(|flag| StylespaceError::UnknownFlag {
                flag,
                context: context.to_string(),
            })
        })
        .collect()
}

/// Integers stay name IDs, anything else must be a NameRecord.
fn elided_fallback(tree: &Value, key: &'static str) -> Result<ElidedFallback> {
    match tree {
        Value::Integer(id) => id
            .as_unsigned()
            .and_then(|id| u32::try_from(id).ok())
            .map(ElidedFallback::NameId)
            .ok_or_else(|| StylespaceError::InvalidType {
                key,
                expected: "a non-negative name ID",
                context: "the Stylespace".to_string(),
            }),
        other => name_record(other).map(ElidedFallback::Name),
    }
}

fn number(tree: &Value) -> Option<f64> {
    match tree {
        Value::Real(value) => Some(*value),
        Value::Integer(value) => {
            value.as_signed().map(|v| v as f64).or_else(|| value.as_unsigned().map(|v| v as f64))
        }
        _ => None,
    }
}

fn unstructure_axis(axis: &Axis) -> Value {
    let mut dict = Dictionary::new();
    dict.insert(NAME.into(), unstructure_name(&axis.name));
    dict.insert(TAG.into(), Value::String(axis.tag.clone()));
    dict.insert(
        LOCATIONS.into(),
        Value::Array(axis.locations.iter().map(unstructure_axis_location).collect()),
    );
    if let Some(ordering) = axis.ordering {
        dict.insert(ORDERING.into(), Value::Integer(u64::from(ordering).into()));
    }
    Value::Dictionary(dict)
}

fn unstructure_axis_location(location: &AxisLocation) -> Value {
    let mut dict = Dictionary::new();
    dict.insert(NAME.into(), unstructure_name(location.name()));
    match location {
        AxisLocation::Format1(l) => {
            dict.insert(VALUE.into(), Value::Real(l.value));
        }
        AxisLocation::Format2(l) => {
            dict.insert(NOMINAL_VALUE.into(), Value::Real(l.value));
            dict.insert(RANGE_MIN_VALUE.into(), Value::Real(l.range.0));
            dict.insert(RANGE_MAX_VALUE.into(), Value::Real(l.range.1));
        }
        AxisLocation::Format3(l) => {
            dict.insert(VALUE.into(), Value::Real(l.value));
            dict.insert(LINKED_VALUE[0].into(), Value::Real(l.linked_value));
        }
    }
    dict.insert(FLAGS.into(), unstructure_flags(location.flags()));
    Value::Dictionary(dict)
}

fn unstructure_named_location(location: &LocationFormat4) -> Value {
    let axis_values = location
        .axis_values
        .iter()
        .map(|(axis, value)| (axis.clone(), Value::Real(*value)))
        .collect::<Dictionary>();
    let mut dict = Dictionary::new();
    dict.insert(NAME.into(), unstructure_name(&location.name));
    dict.insert(LOCATION[0].into(), Value::Dictionary(axis_values));
    dict.insert(FLAGS.into(), unstructure_flags(&location.flags));
    Value::Dictionary(dict)
}

fn unstructure_name(name: &NameRecord) -> Value {
    Value::Dictionary(
        name.iter()
            .map(|(language, name)| (language.to_string(), Value::String(name.to_string())))
            .collect(),
    )
}

fn unstructure_flags(flags: &Flags) -> Value {
    Value::Array(flags.iter().map(|flag| Value::String(flag.name().to_string())).collect())
}

/// Typed access to the keys of one dictionary, with error context.
struct Fields<'a> {
    dict: &'a Dictionary,
    context: String,
}

impl<'a> Fields<'a> {
    fn new(tree: &'a Value, what: &'static str, context: impl Into<String>) -> Result<Self> {
        let context = context.into();
        match tree.as_dictionary() {
            Some(dict) => Ok(Self { dict, context }),
            None => Err(StylespaceError::InvalidType {
                key: what,
                expected: "a dictionary",
                context,
            }),
        }
    }

    fn with_context(self, context: String) -> Self {
        Self { context, ..self }
    }

    fn invalid(&self, key: &'static str, expected: &'static str) -> StylespaceError {
        StylespaceError::InvalidType {
            key,
            expected,
            context: self.context.clone(),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.dict.contains_key(key)
    }

    /// The first of `keys` that is present.
    fn any(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter().find_map(|key| self.dict.get(key).map(|value| (*key, value)))
    }

    fn required(&self, key: &'static str) -> Result<&'a Value> {
        self.dict
            .get(key)
            .ok_or_else(|| StylespaceError::MissingKey {
                key,
                context: self.context.clone(),
            })
    }

    fn required_string(&self, key: &'static str) -> Result<&'a str> {
        self.required(key)?.as_string().ok_or_else(|| self.invalid(key, "a string"))
    }

    fn required_number(&self, key: &'static str) -> Result<f64> {
        number(self.required(key)?).ok_or_else(|| self.invalid(key, "a number"))
    }

    fn required_array(&self, key: &'static str) -> Result<&'a Vec<Value>> {
        self.required(key)?.as_array().ok_or_else(|| self.invalid(key, "a list"))
    }

    fn array(&self, key: &'static str) -> Result<Option<&'a Vec<Value>>> {
        self.dict
            .get(key)
            .map(|value| value.as_array().ok_or_else(|| self.invalid(key, "a list")))
            .transpose()
    }

    fn integer(&self, key: &'static str) -> Result<Option<i64>> {
        self.dict
            .get(key)
            .map(|value| {
                value
                    .as_signed_integer()
                    .ok_or_else(|| self.invalid(key, "an integer"))
            })
            .transpose()
    }

    fn flags(&self) -> Result<Flags> {
        match self.dict.get(FLAGS) {
            Some(flags) => flag_list(flags, &self.context),
            None => Ok(Flags::default()),
        }
    }
}
