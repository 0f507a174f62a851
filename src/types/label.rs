//! Class labels and the ordered label set.
//!
//! The position of each identifier in a [`LabelSet`] is the index of the
//! corresponding unit in the model's output layer. Nothing in the model
//! artifact records that order, so the set must be kept in sync with the
//! order used at training time.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CookError, Result};

/// Class order of the five-class MobileNet fine-tune the service ships with.
pub const DEFAULT_LABELS: [&str; 5] = [
    "apple_pie",
    "baby_back_ribs",
    "baklava",
    "beef_carpaccio",
    "beef_tartare",
];

/// One output category of the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassLabel {
    /// Position in the model output.
    pub index: usize,
    /// Identifier used as the recipe store key (e.g. `baby_back_ribs`).
    pub id: String,
}

impl ClassLabel {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
        }
    }

    /// Display form of the identifier, e.g. `baby_back_ribs` → `Baby Back Ribs`.
    pub fn humanized(&self) -> String {
        humanize(&self.id)
    }
}

/// Turn a snake_case identifier into title-cased words.
///
/// Underscores become spaces. A letter is uppercased when it starts the
/// string or follows a non-letter, and lowercased otherwise, so
/// `dim-sum_2go` becomes `Dim-Sum 2Go`.
pub fn humanize(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut after_letter = false;
    for c in id.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Ordered, fixed set of class identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set, rejecting empty sets, blank identifiers and duplicates.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(CookError::Configuration("label set is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(CookError::Configuration(format!(
                    "label at position {index} is blank"
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(CookError::Configuration(format!(
                    "duplicate label '{label}' at position {index}"
                )));
            }
        }

        Ok(Self { labels })
    }

    /// Parse a manifest with one identifier per line. Blank lines are skipped.
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Load a label manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CookError::Configuration(format!("Failed to read label manifest {path:?}: {e}"))
        })?;
        Self::from_manifest_str(&content)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<ClassLabel> {
        self.labels
            .get(index)
            .map(|id| ClassLabel::new(index, id.clone()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = ClassLabel> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, id)| ClassLabel::new(index, id.clone()))
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
