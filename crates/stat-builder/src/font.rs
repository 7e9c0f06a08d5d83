//! Read-only views of a variable font and helpers to rewrite font binaries.

use indexmap::IndexMap;
use read_fonts::{
    FontRef, ReadError, TableProvider,
    types::{NameId, Tag},
};
use write_fonts::FontBuilder;

use crate::{
    error::{Error, Result},
    names::NameTable,
};

/// A variation axis as declared in `fvar`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAxis {
    pub tag: Tag,
    pub name_id: NameId,
}

/// A named instance: axis tag to coordinate, in `fvar` axis order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedInstance {
    pub coordinates: IndexMap<Tag, f64>,
}

/// What STAT generation needs to know about a font.
pub trait VariableFont {
    /// Variation axes in `fvar` order.
    fn axes(&self) -> &[FontAxis];

    fn instances(&self) -> &[NamedInstance];

    /// The font's current name table.
    fn name_table(&self) -> &NameTable;

    /// Windows English name for `name_id`, if any.
    fn english_name(&self, name_id: NameId) -> Option<&str> {
        self.name_table().english_name(name_id.to_u16())
    }
}

/// An owned snapshot of the `fvar` axes, named instances and `name` records.
#[derive(Debug, Clone, Default)]
pub struct FontSnapshot {
    pub axes: Vec<FontAxis>,
    pub instances: Vec<NamedInstance>,
    pub names: NameTable,
}

impl FontSnapshot {
    /// Capture the variation data of a font.
    ///
    /// Fails with [`Error::NotVariableFont`] when there is no `fvar` table.
    pub fn from_font(font: &FontRef) -> Result<Self> {
        let fvar = match font.fvar() {
            Ok(fvar) => fvar,
            Err(ReadError::TableIsMissing(_)) => return Err(Error::NotVariableFont),
            Err(e) => return Err(e.into()),
        };

        let axes: Vec<FontAxis> = fvar
            .axes()?
            .iter()
            .map(|axis| FontAxis {
                tag: axis.axis_tag(),
                name_id: axis.axis_name_id(),
            })
            .collect();

        let instances = fvar
            .instances()?
            .iter()
            .map(|instance| {
                let instance = instance?;
                let coordinates = axes
                    .iter()
                    .zip(instance.coordinates)
                    .map(|(axis, value)| (axis.tag, value.get().to_f64()))
                    .collect();
                Ok(NamedInstance { coordinates })
            })
            .collect::<Result<Vec<_>>>()?;

        let names = NameTable::from_font(font)?;
        Ok(Self {
            axes,
            instances,
            names,
        })
    }

    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::from_font(&FontRef::new(data)?)
    }
}

impl VariableFont for FontSnapshot {
    fn axes(&self) -> &[FontAxis] {
        &self.axes
    }

    fn instances(&self) -> &[NamedInstance] {
        &self.instances
    }

    fn name_table(&self) -> &NameTable {
        &self.names
    }
}

/// Rebuild font data with every table copied, then let `f` replace or add tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}
