//! User domain records and country normalization.

use serde::{Deserialize, Serialize};

use crate::types::Score;

/// Display name substituted when a stored profile carries none.
pub const DEFAULT_NAME: &str = "Default";

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

/// Profile fields kept in the record store, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, free text.
    #[serde(default = "default_name")]
    pub name: String,
    /// Country in canonical form.
    pub country: String,
}

/// Fully hydrated leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Unique identity and record-store key.
    pub email: String,
    /// Country in canonical form.
    pub country: String,
    /// Current score.
    pub score: Score,
}

/// Folds a country name to its canonical form: first letter upper, rest lower.
///
/// "india", "INDIA", and "India" all resolve to the same country partition.
pub fn normalize_country(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
