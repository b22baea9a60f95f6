use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const SCHEMA_VERSION: &str = "1.0";

/// On-disk database document: named tables of JSON records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub schema_version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Value>>,
}

impl Document {
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            title: None,
            tables: BTreeMap::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

/// Database open modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbMode {
    /// `r`: read only, file must exist
    Read,
    /// `w`: create, discarding any existing content
    Write,
    /// `a`: read and write, created if absent
    Append,
    /// `r+`: read and write, file must exist
    ReadWrite,
}

impl DbMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbMode::Read => "r",
            DbMode::Write => "w",
            DbMode::Append => "a",
            DbMode::ReadWrite => "r+",
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, DbMode::Read)
    }
}

impl fmt::Display for DbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(DbMode::Read),
            "w" => Ok(DbMode::Write),
            "a" => Ok(DbMode::Append),
            "r+" => Ok(DbMode::ReadWrite),
            _ => Err(format!("Invalid database mode: {s}")),
        }
    }
}
