//! The STAT generation job shared by every font of an invocation.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use stat_builder::{FontSnapshot, apply_stylespace_to_variable_font, generate};
use statmake_stylespace::{AdditionalLocations, DesignspaceLib, Stylespace};

use crate::io::FontFile;

/// A Stylespace plus the additional locations from the design-space lib.
#[derive(Debug, Clone)]
pub struct StatJob {
    pub stylespace: Stylespace,
    pub additional_locations: AdditionalLocations,
}

impl StatJob {
    /// Load the job from a design-space document.
    ///
    /// Without an explicit `stylespace` file the Stylespace is taken from
    /// the document's lib.
    pub fn load(designspace: &Path, stylespace: Option<&Path>) -> Result<Self> {
        let lib = DesignspaceLib::load(designspace).with_context(|| {
            format!("Failed to load designspace: {}", designspace.display())
        })?;
        let stylespace = match stylespace {
            Some(path) => Stylespace::from_file(path)
                .with_context(|| format!("Failed to load Stylespace: {}", path.display()))?,
            None => lib.stylespace().with_context(|| {
                format!("Failed to load Stylespace from designspace: {}", designspace.display())
            })?,
        };
        let additional_locations = lib.additional_locations().with_context(|| {
            format!("Invalid additional locations in {}", designspace.display())
        })?;
        debug!("Additional locations: {additional_locations:?}");
        Ok(Self {
            stylespace,
            additional_locations,
        })
    }

    /// Rewrite the font's `STAT` and `name` tables.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(apply_stylespace_to_variable_font(data, &self.stylespace, &self.additional_locations)?)
    }

    /// Generate `input`'s tables and write the font to `output`.
    pub fn apply_to(&self, input: &FontFile, output: &FontFile) -> Result<()> {
        input.transform_into(output, |data| self.apply(data))
    }

    /// Render the records that would be written, without touching the font.
    pub fn dump(&self, data: &[u8]) -> Result<String> {
        let font = FontSnapshot::from_data(data)?;
        let generated = generate(&self.stylespace, &font, &self.additional_locations)?;
        Ok(generated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const STYLESPACE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
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
    <dict>
      <key>name</key><string>Italic</string>
      <key>tag</key><string>ital</string>
      <key>locations</key>
      <array>
        <dict><key>name</key><string>Upright</string><key>value</key><integer>0</integer></dict>
      </array>
    </dict>
  </array>
</dict>
</plist>
"#;

    fn designspace(lib: &str) -> String {
        format!(
            r#"<?xml version='1.0' encoding='UTF-8'?>
<designspace format="5.0">
  <axes>
    <axis tag="wght" name="Weight" minimum="400" maximum="700" default="400"/>
  </axes>
  <sources>
    <source filename="Test-Regular.ufo" name="Test Regular">
      <location>
        <dimension name="Weight" xvalue="400"/>
      </location>
    </source>
  </sources>
  <lib>
    <dict>
      {lib}
    </dict>
  </lib>
</designspace>
"#
        )
    }

    fn fixture(lib: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Test.stylespace"), STYLESPACE).unwrap();
        let path = dir.path().join("Test.designspace");
        fs::write(&path, designspace(lib)).unwrap();
        (dir, path)
    }

    #[test]
    fn stylespace_from_lib_path() {
        let (_dir, path) = fixture(
            "<key>org.statmake.stylespacePath</key><string>Test.stylespace</string>
             <key>org.statmake.additionalLocations</key>
             <dict><key>Italic</key><integer>0</integer></dict>",
        );
        let job = StatJob::load(&path, None).unwrap();
        assert_eq!(job.stylespace.axes().len(), 2);
        assert_eq!(job.additional_locations.get("Italic"), Some(&0.0));
    }

    #[test]
    fn explicit_stylespace_wins() {
        let (dir, path) = fixture("");
        let job = StatJob::load(&path, Some(&dir.path().join("Test.stylespace"))).unwrap();
        assert_eq!(job.stylespace.axes().len(), 2);
        assert!(job.additional_locations.is_empty());
    }

    #[test]
    fn missing_stylespace_reported() {
        let (_dir, path) = fixture("");
        let err = StatJob::load(&path, None).unwrap_err();
        assert!(format!("{err:?}").contains(" lib "), "{err:?}");
    }

    #[test]
    fn non_font_rejected_without_writing() {
        let (dir, path) = fixture("");
        let job = StatJob::load(&path, Some(&dir.path().join("Test.stylespace"))).unwrap();
        let input = FontFile::new(dir.path().join("Test.stylespace"));
        let output = FontFile::new(dir.path().join("out.ttf"));
        assert!(job.apply_to(&input, &output).is_err());
        assert!(!output.path().exists());
        assert!(job.dump(b"not a font").is_err());
    }
}
