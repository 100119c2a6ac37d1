use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod hierarchy;

pub use hierarchy::{HierarchyNode, HierarchyTree, build_hierarchy};

pub const DEFAULT_PATH_DELIMITER: char = '/';

/// Parameter name to value, keyed either by full name or by its last segment.
pub type FlatMapping = BTreeMap<String, String>;

/// A single parameter as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    name: String,
    value: String,
    #[serde(default)]
    is_secret: bool,
}

impl ParameterRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_secret: false,
        }
    }

    pub fn secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_secret: true,
            ..Self::new(name, value)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_secret(&self) -> bool {
        self.is_secret
    }

    /// Mapping key for this record: the full name, or its final segment when
    /// `strip_path` is set.
    pub fn key(&self, strip_path: bool, delimiter: char) -> &str {
        if strip_path {
            self.name.rsplit(delimiter).next().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    pub fn into_entry(self, strip_path: bool, delimiter: char) -> (String, String) {
        let key = self.key(strip_path, delimiter).to_string();
        (key, self.value)
    }
}

impl fmt::Display for ParameterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // values may be decrypted secrets
        write!(f, "{}", self.name)
    }
}

/// One response of a paginated remote listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPage {
    records: Vec<ParameterRecord>,
    next_token: Option<String>,
}

impl ParameterPage {
    pub fn new(records: Vec<ParameterRecord>, next_token: Option<String>) -> Self {
        Self {
            records,
            next_token,
        }
    }

    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }

    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    pub fn into_parts(self) -> (Vec<ParameterRecord>, Option<String>) {
        (self.records, self.next_token)
    }
}

/// Request fields for a by-path listing, minus the continuation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub path: String,
    pub decrypt: bool,
    pub recursive: bool,
}

impl PathQuery {
    pub fn new(path: impl Into<String>, decrypt: bool, recursive: bool) -> Self {
        Self {
            path: path.into(),
            decrypt,
            recursive,
        }
    }
}
