//! Domain types shared by every starsync crate.
//!
//! Stars come from the code host, rows come from the destination table.
//! Both are plain owned values; nothing here performs I/O.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of a destination-table row (a Notion page id, or a
/// synthetic id for in-memory tables).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub String);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A credential that must never end up in logs or terminal output.
///
/// `Debug` and `Display` both print `***`; call [`Secret::expose`] at the
/// single point where the value goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

// ---------------------------------------------------------------------------
// Stars
// ---------------------------------------------------------------------------

/// One starred repository, as seen at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub name: String,
    pub url: String,
    /// Repositories without a description come back as `null`; stored as "".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl StarRecord {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// Deserialize an optional string, mapping `null` to the empty string.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// Field values keyed by column name.
pub type Fields = BTreeMap<String, String>;

/// Column names used to address the three fields starsync manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            url: "URL".to_string(),
            description: "Description".to_string(),
        }
    }
}

impl FieldNames {
    /// Field values for a brand-new row mirroring `star`.
    pub fn fields_for(&self, star: &StarRecord) -> Fields {
        let mut fields = Fields::new();
        fields.insert(self.name.clone(), star.name.clone());
        fields.insert(self.description.clone(), star.description.clone());
        fields.insert(self.url.clone(), star.url.clone());
        fields
    }

    pub fn all(&self) -> [&str; 3] {
        [&self.name, &self.url, &self.description]
    }
}

/// Snapshot of one destination row.
///
/// Fields are read through [`TableRow::get_field`]; an absent field reads as
/// the empty string, the same as an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: RowId,
    fields: Fields,
}

impl TableRow {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn get_field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
