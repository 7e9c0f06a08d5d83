//! Stylespace references embedded in designspace documents.
//!
//! A designspace `<lib>` either carries the Stylespace inline or points at
//! an external Stylespace file relative to the designspace itself. It may
//! also pin the font on axes it does not define through additional locations.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use plist::{Dictionary, Value};

use crate::{
    error::{Result, StylespaceError},
    stylespace::Stylespace,
};

/// Lib key holding an inline Stylespace.
pub const STYLESPACE_INLINE_KEY: &str = "org.statmake.stylespace";
/// Lib key holding a Stylespace path relative to the designspace.
pub const STYLESPACE_PATH_KEY: &str = "org.statmake.stylespacePath";
/// Lib key holding additional axis locations.
pub const ADDITIONAL_LOCATIONS_KEY: &str = "org.statmake.additionalLocations";

/// Axis name to coordinate for axes the font does not contain.
pub type AdditionalLocations = IndexMap<String, f64>;

/// The `<lib>` of a designspace document and where the document lives.
#[derive(Debug, Clone, Default)]
pub struct DesignspaceLib {
    pub lib: Dictionary,
    /// Path of the designspace file, if known.
    pub path: Option<PathBuf>,
}

impl DesignspaceLib {
    pub fn new(lib: Dictionary, path: Option<PathBuf>) -> Self {
        Self { lib, path }
    }

    /// Load the lib of a designspace file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = norad::designspace::DesignSpaceDocument::load(path).map_err(|e| {
            StylespaceError::Designspace {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(document.lib, Some(path.to_path_buf())))
    }

    /// Resolve the Stylespace referenced by this lib.
    pub fn stylespace(&self) -> Result<Stylespace> {
        Stylespace::from_designspace_lib(&self.lib, self.path.as_deref())
    }

    pub fn additional_locations(&self) -> Result<AdditionalLocations> {
        additional_locations(&self.lib)
    }
}

impl Stylespace {
    /// Resolve the Stylespace referenced by a designspace lib.
    ///
    /// Exactly one of the inline and path keys must be present. A relative
    /// path is resolved against the directory of `document_path`.
    pub fn from_designspace_lib(lib: &Dictionary, document_path: Option<&Path>) -> Result<Self> {
        match (lib.get(STYLESPACE_INLINE_KEY), lib.get(STYLESPACE_PATH_KEY)) {
            (Some(inline), None) => {
                debug!("Using inline Stylespace");
                Stylespace::structure(inline)
            }
            (None, Some(Value::String(relative))) => {
                let relative = PathBuf::from(relative);
                let document = document_path
                    .ok_or_else(|| StylespaceError::UnknownDocumentLocation(relative.clone()))?;
                let path = document.parent().unwrap_or(Path::new("")).join(&relative);
                debug!("Using external Stylespace {}", path.display());
                Stylespace::from_file(path)
            }
            (None, Some(_)) => Err(StylespaceError::InvalidType {
                key: STYLESPACE_PATH_KEY,
                expected: "a string",
                context: "the designspace lib".to_string(),
            }),
            _ => Err(StylespaceError::AmbiguousDesignspaceReference),
        }
    }

    /// Resolve the Stylespace referenced by a designspace file.
    pub fn from_designspace(path: impl AsRef<Path>) -> Result<Self> {
        DesignspaceLib::load(path)?.stylespace()
    }
}

/// Read additional locations from a designspace lib; empty when the key is absent.
pub fn additional_locations(lib: &Dictionary) -> Result<AdditionalLocations> {
    let Some(locations) = lib.get(ADDITIONAL_LOCATIONS_KEY) else {
        return Ok(AdditionalLocations::new());
    };
    let invalid = || StylespaceError::InvalidType {
        key: ADDITIONAL_LOCATIONS_KEY,
        expected: "a dictionary of axis names to numbers",
        context: "the designspace lib".to_string(),
    };
    locations
        .as_dictionary()
        .ok_or_else(invalid)?
        .iter()
        .map(|(axis, value)| {
            let value = match value {
                Value::Real(v) => *v,
                Value::Integer(v) => v.as_signed().ok_or_else(invalid)? as f64,
                _ => return Err(invalid()),
            };
            Ok((axis.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const STYLESPACE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>axes</key>
  <array>
    <dict>
      <key>name</key><string>Weight</string>
      <key>tag</key><string>wght</string>
      <key>locations</key>
      <array>
        <dict><key>name</key><string>Regular</string><key>value</key><integer>400</integer></dict>
      </array>
    </dict>
  </array>
</dict>
</plist>
"#;

    fn inline_tree() -> Value {
        Value::from_reader(std::io::Cursor::new(STYLESPACE.as_bytes())).unwrap()
    }

    #[test]
    fn inline_stylespace() {
        let mut lib = Dictionary::new();
        lib.insert(STYLESPACE_INLINE_KEY.into(), inline_tree());
        let stylespace = DesignspaceLib::new(lib, None).stylespace().unwrap();
        assert_eq!(stylespace.axes()[0].tag, "wght");
    }

    #[test]
    fn both_keys_rejected() {
        let mut lib = Dictionary::new();
        lib.insert(STYLESPACE_INLINE_KEY.into(), inline_tree());
        lib.insert(STYLESPACE_PATH_KEY.into(), Value::String("Test.stylespace".into()));
        let err = DesignspaceLib::new(lib, None).stylespace().unwrap_err();
        assert!(matches!(err, StylespaceError::AmbiguousDesignspaceReference));
        assert!(err.to_string().contains(" lib "));
    }

    #[test]
    fn neither_key_rejected() {
        let err = DesignspaceLib::default().stylespace().unwrap_err();
        assert!(matches!(err, StylespaceError::AmbiguousDesignspaceReference));
    }

    #[test]
    fn relative_path_needs_document_location() {
        let mut lib = Dictionary::new();
        lib.insert(STYLESPACE_PATH_KEY.into(), Value::String("Test.stylespace".into()));
        let err = DesignspaceLib::new(lib, None).stylespace().unwrap_err();
        assert!(matches!(err, StylespaceError::UnknownDocumentLocation(_)));
    }

    #[test]
    fn relative_path_resolved_against_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("stylespaces")).unwrap();
        fs::write(dir.path().join("stylespaces/Test.stylespace"), STYLESPACE).unwrap();

        let mut lib = Dictionary::new();
        lib.insert(
            STYLESPACE_PATH_KEY.into(),
            Value::String("stylespaces/Test.stylespace".into()),
        );
        let document = dir.path().join("Test.designspace");
        let stylespace = DesignspaceLib::new(lib, Some(document)).stylespace().unwrap();
        assert_eq!(stylespace.axes()[0].name.default(), "Weight");
    }

    #[test]
    fn additional_locations_parsed() {
        let mut locations = Dictionary::new();
        locations.insert("Italic".into(), Value::Integer(1.into()));
        locations.insert("Width".into(), Value::Real(87.5));
        let mut lib = Dictionary::new();
        lib.insert(ADDITIONAL_LOCATIONS_KEY.into(), Value::Dictionary(locations));

        let additional = DesignspaceLib::new(lib, None).additional_locations().unwrap();
        assert_eq!(additional.get("Italic"), Some(&1.0));
        assert_eq!(additional.get("Width"), Some(&87.5));
        assert!(DesignspaceLib::default().additional_locations().unwrap().is_empty());
    }

    #[test]
    fn additional_locations_must_be_numbers() {
        let mut locations = Dictionary::new();
        locations.insert("Italic".into(), Value::String("yes".into()));
        let mut lib = Dictionary::new();
        lib.insert(ADDITIONAL_LOCATIONS_KEY.into(), Value::Dictionary(locations));
        assert!(DesignspaceLib::new(lib, None).additional_locations().is_err());
    }
}
