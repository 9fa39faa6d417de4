//! Common types used throughout pulse-etl
//!
//! This module contains the path-derived classification types
//! (`DataType`, `Category`, `Scope`, `ExtractionKey`) and the coordinates
//! injected into every extracted row.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Data Type
// ============================================================================

/// Top-level shape family of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Aggregated,
    Map,
    Top,
}

impl DataType {
    /// All data types, in directory order
    pub const ALL: [DataType; 3] = [DataType::Aggregated, DataType::Map, DataType::Top];

    /// Directory marker for this data type
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Aggregated => "aggregated",
            DataType::Map => "map",
            DataType::Top => "top",
        }
    }

    /// Parse a directory segment
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == segment)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Category
// ============================================================================

/// Payment domain of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Insurance,
    Transaction,
    User,
}

impl Category {
    /// All categories, in directory order
    pub const ALL: [Category; 3] = [Category::Insurance, Category::Transaction, Category::User];

    /// Directory name for this category
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Insurance => "insurance",
            Category::Transaction => "transaction",
            Category::User => "user",
        }
    }

    /// Parse a directory segment
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == segment)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Geographic granularity of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// National aggregate
    Country,
    /// One state or union territory
    State,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Country => "country",
            Scope::State => "state",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Extraction Key
// ============================================================================

/// The `(data_type, category, scope)` triple a file is classified under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtractionKey {
    pub data_type: DataType,
    pub category: Category,
    pub scope: Scope,
}

impl ExtractionKey {
    pub fn new(data_type: DataType, category: Category, scope: Scope) -> Self {
        Self {
            data_type,
            category,
            scope,
        }
    }
}

impl fmt::Display for ExtractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.data_type, self.category, self.scope)
    }
}

// ============================================================================
// State Name
// ============================================================================

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_\s]+").expect("separator pattern is valid"));

/// A normalized state, union territory or district name
///
/// Separator runs (`-`, `_`, whitespace) collapse to one space and the
/// result is title-cased, so `"andhra-pradesh"` becomes `"Andhra Pradesh"`.
/// Normalizing an already-normalized name is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StateName(String);

impl StateName {
    /// Normalize a raw slug or display name
    pub fn new(raw: &str) -> Self {
        let spaced = SEPARATORS.replace_all(raw.trim(), " ");
        Self(title_case(spaced.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Uppercase the first letter of every word, lowercase the rest
///
/// A word starts at any letter not preceded by another letter, which keeps
/// `"andaman & nicobar"` and `"jammu-&-kashmir"` readable.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

// ============================================================================
// Coordinates
// ============================================================================

/// Path-derived coordinates of one snapshot file
///
/// Injected into every row extracted from that file; extractors never read
/// year, quarter or state from the payload body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    pub year: i32,
    pub quarter: u8,
    pub state: Option<StateName>,
}

impl Coordinates {
    /// Coordinates of a country-level file
    pub fn country(year: i32, quarter: u8) -> Self {
        Self {
            year,
            quarter,
            state: None,
        }
    }

    /// Coordinates of a per-state file
    pub fn state(year: i32, quarter: u8, state: StateName) -> Self {
        Self {
            year,
            quarter,
            state: Some(state),
        }
    }

    pub fn scope(&self) -> Scope {
        if self.state.is_some() {
            Scope::State
        } else {
            Scope::Country
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("andhra-pradesh", "Andhra Pradesh" ; "slug")]
    #[test_case("Andhra Pradesh", "Andhra Pradesh" ; "already normalized")]
    #[test_case("andaman-&-nicobar-islands", "Andaman & Nicobar Islands" ; "ampersand")]
    #[test_case("dadra-&-nagar-haveli-&-daman-&-diu", "Dadra & Nagar Haveli & Daman & Diu" ; "long slug")]
    #[test_case("  west_bengal ", "West Bengal" ; "underscore and padding")]
    #[test_case("NORTH GOA", "North Goa" ; "upper case")]
    #[test_case("karnataka", "Karnataka" ; "single word")]
    fn test_state_name_normalization(raw: &str, expected: &str) {
        assert_eq!(StateName::new(raw).as_str(), expected);
    }

    #[test]
    fn test_state_name_idempotent() {
        for raw in ["andhra-pradesh", "jammu-&-kashmir", "uttar_pradesh", "Delhi"] {
            let once = StateName::new(raw);
            let twice = StateName::new(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_segment_parsing() {
        assert_eq!(DataType::from_segment("map"), Some(DataType::Map));
        assert_eq!(DataType::from_segment("mapping"), None);
        assert_eq!(Category::from_segment("user"), Some(Category::User));
        assert_eq!(Category::from_segment("loans"), None);
    }

    #[test]
    fn test_extraction_key_display() {
        let key = ExtractionKey::new(DataType::Top, Category::Insurance, Scope::State);
        assert_eq!(key.to_string(), "top/insurance/state");
    }

    #[test]
    fn test_coordinates_scope() {
        assert_eq!(Coordinates::country(2022, 1).scope(), Scope::Country);
        let coords = Coordinates::state(2022, 1, StateName::new("karnataka"));
        assert_eq!(coords.scope(), Scope::State);
    }
}
