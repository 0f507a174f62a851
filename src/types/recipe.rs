//! Recipe metadata attached to a class label.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown in place of a missing name-less field (calories, ingredients).
pub const DATA_NOT_AVAILABLE: &str = "Data tidak tersedia";

/// Shown in place of missing instructions.
pub const RECIPE_NOT_ADDED: &str = "Resep belum ditambahkan.";

/// Metadata for one class. Every field is optional; consumers apply fallbacks.
///
/// Field names on disk follow the recipe database format (`nama`,
/// `kalori_per_sajian`, `bahan_utama`, `cara_membuat`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Display name.
    #[serde(default, rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Calorie estimate per serving. Accepts a string or a number on disk.
    #[serde(
        default,
        rename = "kalori_per_sajian",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub calories: Option<String>,

    /// Main ingredients, comma separated.
    #[serde(default, rename = "bahan_utama", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,

    /// Preparation steps, one per line.
    #[serde(default, rename = "cara_membuat", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl RecipeRecord {
    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.calories.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number for kalori_per_sajian, got {other}"
        ))),
    }
}
