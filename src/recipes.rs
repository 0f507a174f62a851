//! Recipe store.
//!
//! An immutable map from class identifier to [`RecipeRecord`], loaded once
//! from the JSON recipe database at startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::types::{LabelSet, RecipeRecord};
use crate::{CookError, Result};

static EMPTY_RECORD: RecipeRecord = RecipeRecord {
    name: None,
    calories: None,
    ingredients: None,
    instructions: None,
};

/// Read-only mapping of class identifier → recipe metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeStore {
    records: HashMap<String, RecipeRecord>,
}

impl RecipeStore {
    /// Parse the recipe database from a JSON object keyed by class identifier.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: HashMap<String, RecipeRecord> = serde_json::from_str(content)
            .map_err(|e| CookError::RecipeStore(format!("Failed to parse recipe database: {e}")))?;
        Ok(Self { records })
    }

    /// Load the recipe database from disk. A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CookError::RecipeStore(format!("Failed to read recipe file {path:?}: {e}"))
        })?;
        let store = Self::from_json_str(&content).map_err(|e| match e {
            CookError::RecipeStore(msg) => CookError::RecipeStore(format!("{path:?}: {msg}")),
            other => other,
        })?;
        info!(path = %path.display(), recipes = store.len(), "recipe database loaded");
        Ok(store)
    }

    /// Record for `label`, or an empty record when the label is unknown.
    pub fn lookup(&self, label: &str) -> &RecipeRecord {
        self.records.get(label).unwrap_or(&EMPTY_RECORD)
    }

    /// Record for `label` if one is stored.
    pub fn get(&self, label: &str) -> Option<&RecipeRecord> {
        self.records.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored identifiers, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.records.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Identifiers from `labels` with no stored recipe, in label order.
    pub fn missing<'a>(&self, labels: &'a LabelSet) -> Vec<&'a str> {
        labels
            .as_slice()
            .iter()
            .map(String::as_str)
            .filter(|label| !self.contains(label))
            .collect()
    }
}

impl FromIterator<(String, RecipeRecord)> for RecipeStore {
    fn from_iter<I: IntoIterator<Item = (String, RecipeRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
