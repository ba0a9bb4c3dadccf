//! Character and subtitle-type lookup tables
//!
//! Maps the `Unknown2` (character id) and `Unknown3` (subtype code)
//! attributes of message entries to human-readable labels. Tables are built
//! once per run and only ever read afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Built-in character id → display name table
const DEFAULT_CHARACTERS: &[(&str, &str)] = &[
    ("90010001", "Clive"),
    ("90020001", "Clive"),
    ("100100", "Clive"),
    ("100101", "Clive"),
    ("302200", "Aevis"),
    ("302300", "Tiamat"),
    ("302400", "Biast"),
    ("90040001", "Eugen Havel"),
    ("90040002", "Barnabas"),
    ("90040003", "Sleipnir"),
    ("90040004", "Benedikta"),
    ("200101", "Benedikta"),
    ("200102", "Benedikta"),
    ("90040005", "Kupka"),
    ("200200", "Kupka"),
    ("90080001", "Joshua"),
    ("90080002", "Rodney"),
    ("301400", "Rodney"),
    ("100200", "Joshua"),
    ("100206", "Joshua"),
    ("100300", "Jill"),
    ("300800", "Anabella"),
    ("300900", "Elwin"),
    ("301200", "Tyler"),
    ("301201", "Tyler"),
    ("301300", "Wade"),
    ("301303", "Wade"),
    ("100400", "Cid"),
];

/// Built-in subtype code → category label table
const DEFAULT_SUBTYPES: &[(&str, &str)] = &[("0", "Normal"), ("1", "Hidden"), ("2", "SFX")];

/// On-disk shape of a lookup configuration file
#[derive(Debug, Default, Deserialize)]
struct LookupConfig {
    #[serde(default)]
    characters: BTreeMap<String, Value>,
    #[serde(default)]
    subtypes: BTreeMap<String, Value>,
}

/// Immutable id → label mappings
#[derive(Debug, Clone)]
pub struct LookupTables {
    characters: HashMap<String, String>,
    subtypes: HashMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_CHARACTERS, DEFAULT_SUBTYPES)
    }
}

impl LookupTables {
    /// Build tables from explicit pairs
    #[must_use]
    pub fn from_pairs(characters: &[(&str, &str)], subtypes: &[(&str, &str)]) -> Self {
        let owned = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        };
        Self {
            characters: owned(characters),
            subtypes: owned(subtypes),
        }
    }

    /// Parse a JSON lookup document with `characters` and `subtypes` keys
    ///
    /// # Errors
    /// Returns [`Error::JsonError`] if the document is not valid JSON of that shape.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: LookupConfig = serde_json::from_str(content)?;
        Ok(Self {
            characters: stringify_values(config.characters),
            subtypes: stringify_values(config.subtypes),
        })
    }

    /// Load a JSON lookup document from disk
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let tables = Self::from_json_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!(
            "Loaded lookup tables from {}: {} characters, {} subtypes",
            path.display(),
            tables.characters.len(),
            tables.subtypes.len()
        );
        Ok(tables)
    }

    /// Display name for a character id, empty when unknown
    #[must_use]
    pub fn character_name(&self, id: &str) -> &str {
        self.characters.get(id).map_or("", String::as_str)
    }

    /// Category label for a subtype code, empty when unknown
    #[must_use]
    pub fn subtype_label(&self, code: &str) -> &str {
        self.subtypes.get(code).map_or("", String::as_str)
    }

    /// Distinct subtype labels ordered by their code
    ///
    /// Numeric codes sort numerically, everything else after them lexically.
    #[must_use]
    pub fn subtype_labels(&self) -> Vec<&str> {
        let mut codes: Vec<&String> = self.subtypes.keys().collect();
        codes.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });

        let mut labels: Vec<&str> = Vec::with_capacity(codes.len());
        for code in codes {
            let label = self.subtypes[code].as_str();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

fn stringify_values(map: BTreeMap<String, Value>) -> HashMap<String, String> {
    map.into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let tables = LookupTables::default();
        assert_eq!(tables.character_name("90010001"), "Clive");
        assert_eq!(tables.character_name("100400"), "Cid");
        assert_eq!(tables.subtype_label("1"), "Hidden");
        assert_eq!(tables.subtype_labels(), vec!["Normal", "Hidden", "SFX"]);
    }

    #[test]
    fn test_unknown_ids_resolve_empty() {
        let tables = LookupTables::default();
        assert_eq!(tables.character_name(""), "");
        assert_eq!(tables.character_name("12345"), "");
        assert_eq!(tables.subtype_label("9"), "");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "characters": {"1": "Torgal", "2": 42},
            "subtypes": {"10": "Radio", "2": "Shout"}
        }"#;
        let tables = LookupTables::from_json_str(json).unwrap();
        assert_eq!(tables.character_name("1"), "Torgal");
        assert_eq!(tables.character_name("2"), "42");
        assert_eq!(tables.subtype_labels(), vec!["Shout", "Radio"]);
    }

    #[test]
    fn test_missing_keys_default_empty() {
        let tables = LookupTables::from_json_str(r#"{"characters": {}}"#).unwrap();
        assert_eq!(tables.subtype_label("0"), "");
        assert!(tables.subtype_labels().is_empty());
    }

    #[test]
    fn test_load_reports_config_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("lookup.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = LookupTables::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
