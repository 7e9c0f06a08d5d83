//! An owned copy of a font's `name` table and the allocator that adds
//! multilingual names to it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use read_fonts::{
    TableProvider,
    tables::name::{Encoding, Name as ReadName},
    types::NameId,
};
use statmake_stylespace::NameRecord;
use write_fonts::tables::name::{LangTagRecord, Name, NameRecord as WriteNameRecord};

use crate::{
    error::{Error, Result},
    languages::{windows_language_id, windows_language_tag},
};

const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_ENGLISH: u16 = 0x0409;
const MAC_PLATFORM: u16 = 1;
const MAC_ROMAN: u16 = 0;
const MAC_ENGLISH: u16 = 0;

/// Language IDs at and above this value index the language-tag records.
const LANG_TAG_BASE: u16 = 0x8000;
/// Newly allocated names start above the reserved range.
const FIRST_FREE_NAME_ID: u16 = 256;
const MAX_NAME_ID: u16 = 32767;

/// One string of the name table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub string: String,
}

impl NameEntry {
    pub fn windows(language_id: u16, name_id: u16, string: impl Into<String>) -> Self {
        Self {
            platform_id: WINDOWS_PLATFORM,
            encoding_id: WINDOWS_UNICODE_BMP,
            language_id,
            name_id,
            string: string.into(),
        }
    }

    fn is_windows_unicode(&self) -> bool {
        self.platform_id == WINDOWS_PLATFORM && self.encoding_id == WINDOWS_UNICODE_BMP
    }
}

/// Name records plus the language-tag records of a version 1 table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
    lang_tags: Vec<String>,
}

impl NameTable {
    pub fn new(entries: Vec<NameEntry>, lang_tags: Vec<String>) -> Self {
        Self { entries, lang_tags }
    }

    /// Copy the `name` table of a font. A font without one yields an empty table.
    pub fn from_font<'a>(font: &impl TableProvider<'a>) -> Result<Self> {
        match font.name() {
            Ok(name) => Self::from_table(&name),
            Err(read_fonts::ReadError::TableIsMissing(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn from_table(name: &ReadName) -> Result<Self> {
        let data = name.string_data();
        let mut entries = Vec::with_capacity(name.name_record().len());
        for record in name.name_record() {
            let (platform_id, encoding_id) = (record.platform_id(), record.encoding_id());
            let name_id = record.name_id().to_u16();
            if matches!(Encoding::new(platform_id, encoding_id), Encoding::Unknown) {
                warn!(
                    "Dropping name record {name_id} with undecodable encoding \
                     ({platform_id}, {encoding_id}, {:#06x})",
                    record.language_id()
                );
                continue;
            }
            entries.push(NameEntry {
                platform_id,
                encoding_id,
                language_id: record.language_id(),
                name_id,
                string: record.string(data)?.chars().collect(),
            });
        }
        let lang_tags = name
            .lang_tag_record()
            .unwrap_or_default()
            .iter()
            .map(|record| Ok(record.lang_tag(data)?.chars().collect()))
            .collect::<Result<Vec<String>>>()?;
        Ok(Self { entries, lang_tags })
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn lang_tags(&self) -> &[String] {
        &self.lang_tags
    }

    pub fn get(
        &self,
        name_id: u16,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
    ) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| {
                e.name_id == name_id
                    && e.platform_id == platform_id
                    && e.encoding_id == encoding_id
                    && e.language_id == language_id
            })
            .map(|e| e.string.as_str())
    }

    /// The Windows English (3, 1, 0x409) string of `name_id`.
    pub fn english_name(&self, name_id: u16) -> Option<&str> {
        self.get(name_id, WINDOWS_PLATFORM, WINDOWS_UNICODE_BMP, WINDOWS_ENGLISH)
    }

    /// A human-readable name for `name_id`.
    ///
    /// Prefers Windows English, then Macintosh English, then any record.
    pub fn debug_name(&self, name_id: u16) -> Option<&str> {
        self.english_name(name_id)
            .or_else(|| self.get(name_id, MAC_PLATFORM, MAC_ROMAN, MAC_ENGLISH))
            .or_else(|| {
                self.entries.iter().find(|e| e.name_id == name_id).map(|e| e.string.as_str())
            })
    }

    /// Windows strings of `name_id` keyed by BCP 47 tag.
    ///
    /// Languages without a known tag are keyed by their hexadecimal ID.
    pub fn windows_names(&self, name_id: u16) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|e| e.name_id == name_id && e.is_windows_unicode())
            .map(|e| (self.language_tag(e.language_id), e.string.clone()))
            .collect()
    }

    /// The Windows strings of `name_id` as a multilingual name.
    ///
    /// Falls back to the debug name for the English entry.
    pub fn name_record(&self, name_id: u16) -> Option<NameRecord> {
        let mut mapping = self.windows_names(name_id);
        if !mapping.contains_key(NameRecord::DEFAULT_LANGUAGE) {
            let english = self.debug_name(name_id)?.to_string();
            mapping.insert(NameRecord::DEFAULT_LANGUAGE.to_string(), english);
        }
        NameRecord::new(mapping).ok()
    }

    fn language_tag(&self, language_id: u16) -> String {
        if language_id >= LANG_TAG_BASE
            && let Some(tag) = self.lang_tags.get(usize::from(language_id - LANG_TAG_BASE))
        {
            return tag.clone();
        }
        match windows_language_tag(language_id) {
            Some(tag) => tag.to_string(),
            None => format!("0x{language_id:04X}"),
        }
    }

    /// Resolve a language tag to a Windows language ID without modifying the table.
    fn language_id(&self, tag: &str) -> Option<u16> {
        windows_language_id(tag).or_else(|| {
            self.lang_tags
                .iter()
                .position(|known| known.eq_ignore_ascii_case(tag))
                .and_then(|index| u16::try_from(index).ok())
                .map(|index| LANG_TAG_BASE + index)
        })
    }

    /// Like [`Self::language_id`] but registers unknown tags as language-tag records.
    fn language_id_or_insert(&mut self, tag: &str) -> u16 {
        if let Some(id) = self.language_id(tag) {
            return id;
        }
        self.lang_tags.push(tag.to_string());
        LANG_TAG_BASE + (self.lang_tags.len() - 1) as u16
    }

    /// The lowest existing ID at or above 256 whose Windows strings are exactly `name`.
    fn find_multilingual(&self, name: &NameRecord) -> Option<u16> {
        let wanted = name
            .iter()
            .map(|(tag, string)| Some((self.language_id(tag)?, string)))
            .collect::<Option<BTreeSet<_>>>()?;

        let mut existing: BTreeMap<u16, BTreeSet<(u16, &str)>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.name_id >= FIRST_FREE_NAME_ID) {
            if entry.is_windows_unicode() {
                existing
                    .entry(entry.name_id)
                    .or_default()
                    .insert((entry.language_id, entry.string.as_str()));
            }
        }
        existing.into_iter().find(|(_, strings)| *strings == wanted).map(|(id, _)| id)
    }

    fn next_free_name_id(&self) -> Result<u16> {
        let max = self
            .entries
            .iter()
            .map(|e| e.name_id)
            .chain([FIRST_FREE_NAME_ID - 1])
            .max()
            .unwrap_or(FIRST_FREE_NAME_ID - 1);
        match max.checked_add(1) {
            Some(id) if id <= MAX_NAME_ID => Ok(id),
            _ => Err(Error::NameIdOverflow),
        }
    }

    fn add_multilingual(&mut self, name: &NameRecord) -> Result<u16> {
        let name_id = self.next_free_name_id()?;
        for (tag, string) in name.iter() {
            let language_id = self.language_id_or_insert(tag);
            self.entries.push(NameEntry::windows(language_id, name_id, string));
        }
        Ok(name_id)
    }

    /// Convert to a `write-fonts` table.
    ///
    /// Records are sorted and deduplicated. Language-tag records make it a
    /// version 1 table.
    pub fn to_table(&self) -> Name {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            (a.platform_id, a.encoding_id, a.language_id, a.name_id).cmp(&(
                b.platform_id,
                b.encoding_id,
                b.language_id,
                b.name_id,
            ))
        });
        entries.dedup_by(|a, b| {
            (a.platform_id, a.encoding_id, a.language_id, a.name_id)
                == (b.platform_id, b.encoding_id, b.language_id, b.name_id)
        });

        let records = entries
            .into_iter()
            .map(|e| {
                WriteNameRecord::new(
                    e.platform_id,
                    e.encoding_id,
                    e.language_id,
                    NameId::new(e.name_id),
                    e.string.into(),
                )
            })
            .collect();
        let mut name = Name::new(records);
        if !self.lang_tags.is_empty() {
            name.lang_tag_record = Some(
                self.lang_tags.iter().map(|tag| LangTagRecord::new(tag.clone().into())).collect(),
            );
        }
        name
    }
}

/// Hands out name IDs for multilingual names during one generation call.
///
/// Identical names share one ID: either an ID already in the font carrying
/// exactly the same Windows strings, or one allocated earlier by this
/// allocator.
#[derive(Debug)]
pub struct NameAllocator {
    table: NameTable,
    assigned: HashMap<NameRecord, u16>,
}

impl NameAllocator {
    pub fn new(table: NameTable) -> Self {
        Self {
            table,
            assigned: HashMap::new(),
        }
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    /// The name ID denoting `name`, adding it to the table when needed.
    pub fn name_id(&mut self, name: &NameRecord) -> Result<NameId> {
        if let Some(id) = self.assigned.get(name) {
            return Ok(NameId::new(*id));
        }
        let id = match self.table.find_multilingual(name) {
            Some(id) => {
                debug!("Reusing name ID {id} for '{}'", name.default());
                id
            }
            None => {
                let id = self.table.add_multilingual(name)?;
                debug!("Added name ID {id} for '{}'", name.default());
                id
            }
        };
        self.assigned.insert(name.clone(), id);
        Ok(NameId::new(id))
    }

    pub fn into_table(self) -> NameTable {
        self.table
    }
}
