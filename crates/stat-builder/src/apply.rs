//! Serialize generated records and write them into a font.

use log::info;
use read_fonts::types::{Fixed, Tag};
use statmake_stylespace::{AdditionalLocations, Stylespace};
use write_fonts::{
    dump_table,
    tables::stat::{AxisRecord, AxisValue, AxisValueRecord, AxisValueTableFlags, Stat},
};

use crate::{
    error::Result,
    font::{FontSnapshot, rewrite_font},
    generator::{GeneratedStat, StatAxisValue, generate},
};

const STAT: Tag = Tag::new(b"STAT");

impl GeneratedStat {
    /// The records as a `write-fonts` table.
    pub fn to_table(&self) -> Stat {
        let axes = self
            .axes
            .iter()
            .map(|axis| AxisRecord::new(axis.tag, axis.name_id, axis.ordering))
            .collect();
        let values = self.values.iter().map(to_axis_value).collect();
        Stat::new(axes, values, self.elided_fallback_name_id)
    }

    /// The compiled `STAT` table, with the header carrying [`Self::version`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = dump_table(&self.to_table())?;
        data[2..4].copy_from_slice(&self.version.minor().to_be_bytes());
        Ok(data)
    }
}

fn to_axis_value(value: &StatAxisValue) -> AxisValue {
    let flags = |bits: u16| AxisValueTableFlags::from_bits_truncate(bits);
    match value {
        StatAxisValue::Format1 { axis_index, flags: bits, name_id, value } => {
            AxisValue::format_1(*axis_index, flags(*bits), *name_id, Fixed::from_f64(*value))
        }
        StatAxisValue::Format2 { axis_index, flags: bits, name_id, nominal, min, max } => {
            AxisValue::format_2(
                *axis_index,
                flags(*bits),
                *name_id,
                Fixed::from_f64(*nominal),
                Fixed::from_f64(*min),
                Fixed::from_f64(*max),
            )
        }
        StatAxisValue::Format3 { axis_index, flags: bits, name_id, value, linked_value } => {
            AxisValue::format_3(
                *axis_index,
                flags(*bits),
                *name_id,
                Fixed::from_f64(*value),
                Fixed::from_f64(*linked_value),
            )
        }
        StatAxisValue::Format4 { flags: bits, name_id, values } => AxisValue::format_4(
            flags(*bits),
            *name_id,
            values
                .iter()
                .map(|(index, value)| AxisValueRecord::new(*index, Fixed::from_f64(*value)))
                .collect(),
        ),
    }
}

/// Generate a STAT table for a variable font and return the rewritten font.
///
/// All tables are copied; `STAT` and `name` are replaced. Nothing is
/// produced when generation fails.
pub fn apply_stylespace_to_variable_font(
    data: &[u8],
    stylespace: &Stylespace,
    additional_locations: &AdditionalLocations,
) -> Result<Vec<u8>> {
    let generated = generate(stylespace, &FontSnapshot::from_data(data)?, additional_locations)?;
    let stat = generated.to_bytes()?;
    let name = generated.names.to_table();

    rewrite_font(data, |_font, builder| {
        builder.add_raw(STAT, stat);
        builder.add_table(&name)?;
        info!(
            "Wrote STAT {} with {} axis values",
            generated.version,
            generated.values.len()
        );
        Ok(())
    })
}
