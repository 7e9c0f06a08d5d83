//! Multilingual display names.

use std::{collections::BTreeMap, ops::Index};

use crate::error::{Result, StylespaceError};

/// A mapping from IETF BCP 47 language tags to display strings.
///
/// Every record carries an `en` entry, which is the default name used to
/// match Stylespace axes against font axes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameRecord {
    mapping: BTreeMap<String, String>,
}

impl NameRecord {
    /// Language tag of the default name.
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// Create a record from language/string pairs.
    ///
    /// Fails if no `en` entry is present.
    pub fn new<K, V>(mapping: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: BTreeMap<String, String> =
            mapping.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        if !mapping.contains_key(Self::DEFAULT_LANGUAGE) {
            return Err(StylespaceError::MissingDefaultName);
        }
        Ok(Self { mapping })
    }

    /// Create an English-only record.
    pub fn from_string(name: impl Into<String>) -> Self {
        let mut mapping = BTreeMap::new();
        mapping.insert(Self::DEFAULT_LANGUAGE.to_string(), name.into());
        Self { mapping }
    }

    /// The default (English) name.
    pub fn default(&self) -> &str {
        // `new` and `from_string` both guarantee the entry
        self.mapping.get(Self::DEFAULT_LANGUAGE).map(String::as_str).unwrap_or_default()
    }

    /// The name in the given language, if present.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.mapping.get(language).map(String::as_str)
    }

    /// Language tags in sorted order.
    pub fn languages(&self) -> Vec<&str> {
        self.mapping.keys().map(String::as_str).collect()
    }

    /// `(language, name)` pairs in language order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

impl Index<&str> for NameRecord {
    type Output = str;

    fn index(&self, language: &str) -> &str {
        match self.mapping.get(language) {
            Some(name) => name,
            None => panic!("no name for language '{language}' in NameRecord '{}'", self.default()),
        }
    }
}

impl From<&str> for NameRecord {
    fn from(name: &str) -> Self {
        Self::from_string(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_is_english() {
        let name = NameRecord::from_string("Bold");
        assert_eq!(name.default(), "Bold");
        assert_eq!(&name["en"], "Bold");
        assert_eq!(name.languages(), vec!["en"]);
    }

    #[test]
    fn multilingual_lookup() {
        let name = NameRecord::new([("en", "Regular"), ("de", "Regulär")]).unwrap();
        assert_eq!(name.default(), "Regular");
        assert_eq!(name.get("de"), Some("Regulär"));
        assert_eq!(name.get("fr"), None);
        assert_eq!(name.languages(), vec!["de", "en"]);
    }

    #[test]
    fn rejects_missing_english() {
        let err = NameRecord::new([("de", "Fett")]).unwrap_err();
        assert!(err.to_string().contains("must have a default English"));
    }

    #[test]
    #[should_panic(expected = "no name for language 'fr'")]
    fn index_missing_language_panics() {
        let name = NameRecord::from_string("Bold");
        let _ = &name["fr"];
    }
}
