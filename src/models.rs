use crate::errors::{CasefileError, CasefileResult};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Top-level document produced by the upstream scanning service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportInput {
    /// Gate for the whole report: false means render the all-clear notice only
    pub threats_found: bool,
    pub data: Vec<ScanResult>,
}

/// One scanned file and everything the scanner flagged in it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanResult {
    pub path: String,
    /// Category labels in scanner order; not deduplicated
    pub threat_class: Vec<String>,
    pub content: String,
    #[serde(default)]
    pub sensitive_info: SensitiveInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensitiveInfo {
    #[serde(default)]
    pub flags: Vec<String>,
    /// Entity-type name to detected value(s), in upstream document order
    #[serde(default, deserialize_with = "ordered_entities")]
    pub detected_entities: Vec<(String, EntityValue)>,
}

/// A detected entity is either one value or several. The shape is decided
/// here, at load time; anything other than a string or a list of strings
/// fails deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    Scalar(String),
    List(Vec<String>),
}

impl EntityValue {
    /// Empty strings and empty lists carry no finding and are never displayed.
    pub fn is_present(&self) -> bool {
        match self {
            EntityValue::Scalar(value) => !value.is_empty(),
            EntityValue::List(values) => !values.is_empty(),
        }
    }

    /// Single display string: scalars as-is, lists comma-joined.
    pub fn display_text(&self) -> String {
        match self {
            EntityValue::Scalar(value) => value.clone(),
            EntityValue::List(values) => values.join(", "),
        }
    }
}

impl SensitiveInfo {
    /// Whether a sensitive-info section should be rendered at all:
    /// any flag, or any entity with a non-empty value.
    pub fn has_findings(&self) -> bool {
        !self.flags.is_empty() || self.detected_entities.iter().any(|(_, value)| value.is_present())
    }

    /// Entities worth displaying, keeping upstream order.
    pub fn present_entities(&self) -> impl Iterator<Item = (&str, &EntityValue)> {
        self.detected_entities
            .iter()
            .filter(|(_, value)| value.is_present())
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl ReportInput {
    /// Parse a report document from a JSON string, failing fast on
    /// malformed JSON or schema drift.
    pub fn from_json_str(raw: &str) -> CasefileResult<Self> {
        serde_json::from_str(raw).map_err(CasefileError::from)
    }

    /// Read and parse a report document from disk.
    pub fn from_file(path: &Path) -> CasefileResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| CasefileError::io(source, Some(path.to_path_buf())))?;
        Self::from_json_str(&raw)
    }
}

/// JSON objects deserialize into a pair vector so the producer's key order
/// survives; a plain map type would re-sort the entity names.
fn ordered_entities<'de, D>(deserializer: D) -> Result<Vec<(String, EntityValue)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedEntities;

    impl<'de> Visitor<'de> for OrderedEntities {
        type Value = Vec<(String, EntityValue)>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a map of entity names to string or string-list values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedEntities)
}
