//! Extractor registry
//!
//! Maps every `(data_type, category, scope)` triple to exactly one
//! extraction strategy. The mapping is an exhaustive match, so adding a
//! data type or category without an extractor fails to compile.

use super::extractors;
use super::schemas;
use super::types::{FlatRecord, TableSchema};
use crate::error::Result;
use crate::types::{Category, Coordinates, DataType, ExtractionKey, JsonValue, Scope};
use serde::Serialize;
use std::fmt;

/// A registered extraction strategy, one per output table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Extractor {
    AggregatedInsuranceCountry,
    AggregatedInsuranceState,
    AggregatedTransactionCountry,
    AggregatedTransactionState,
    AggregatedUserCountry,
    AggregatedUserState,
    MapInsuranceHoverCountry,
    MapInsuranceHoverState,
    MapTransactionHoverCountry,
    MapTransactionHoverState,
    MapUserHoverCountry,
    MapUserHoverState,
    TopInsuranceCountry,
    TopInsuranceState,
    TopTransactionCountry,
    TopTransactionState,
    TopUserCountry,
    TopUserState,
}

impl Extractor {
    /// Every registered extractor, in table order
    pub const ALL: [Extractor; 18] = [
        Extractor::AggregatedInsuranceCountry,
        Extractor::AggregatedInsuranceState,
        Extractor::AggregatedTransactionCountry,
        Extractor::AggregatedTransactionState,
        Extractor::AggregatedUserCountry,
        Extractor::AggregatedUserState,
        Extractor::MapInsuranceHoverCountry,
        Extractor::MapInsuranceHoverState,
        Extractor::MapTransactionHoverCountry,
        Extractor::MapTransactionHoverState,
        Extractor::MapUserHoverCountry,
        Extractor::MapUserHoverState,
        Extractor::TopInsuranceCountry,
        Extractor::TopInsuranceState,
        Extractor::TopTransactionCountry,
        Extractor::TopTransactionState,
        Extractor::TopUserCountry,
        Extractor::TopUserState,
    ];

    /// The extractor registered for a key
    pub fn for_key(key: ExtractionKey) -> Self {
        use Category::{Insurance, Transaction, User};
        use DataType::{Aggregated, Map, Top};
        use Scope::{Country, State};

        match (key.data_type, key.category, key.scope) {
            (Aggregated, Insurance, Country) => Self::AggregatedInsuranceCountry,
            (Aggregated, Insurance, State) => Self::AggregatedInsuranceState,
            (Aggregated, Transaction, Country) => Self::AggregatedTransactionCountry,
            (Aggregated, Transaction, State) => Self::AggregatedTransactionState,
            (Aggregated, User, Country) => Self::AggregatedUserCountry,
            (Aggregated, User, State) => Self::AggregatedUserState,
            (Map, Insurance, Country) => Self::MapInsuranceHoverCountry,
            (Map, Insurance, State) => Self::MapInsuranceHoverState,
            (Map, Transaction, Country) => Self::MapTransactionHoverCountry,
            (Map, Transaction, State) => Self::MapTransactionHoverState,
            (Map, User, Country) => Self::MapUserHoverCountry,
            (Map, User, State) => Self::MapUserHoverState,
            (Top, Insurance, Country) => Self::TopInsuranceCountry,
            (Top, Insurance, State) => Self::TopInsuranceState,
            (Top, Transaction, Country) => Self::TopTransactionCountry,
            (Top, Transaction, State) => Self::TopTransactionState,
            (Top, User, Country) => Self::TopUserCountry,
            (Top, User, State) => Self::TopUserState,
        }
    }

    /// The key this extractor is registered under
    pub fn key(self) -> ExtractionKey {
        use Category::{Insurance, Transaction, User};
        use DataType::{Aggregated, Map, Top};
        use Scope::{Country, State};

        let (data_type, category, scope) = match self {
            Self::AggregatedInsuranceCountry => (Aggregated, Insurance, Country),
            Self::AggregatedInsuranceState => (Aggregated, Insurance, State),
            Self::AggregatedTransactionCountry => (Aggregated, Transaction, Country),
            Self::AggregatedTransactionState => (Aggregated, Transaction, State),
            Self::AggregatedUserCountry => (Aggregated, User, Country),
            Self::AggregatedUserState => (Aggregated, User, State),
            Self::MapInsuranceHoverCountry => (Map, Insurance, Country),
            Self::MapInsuranceHoverState => (Map, Insurance, State),
            Self::MapTransactionHoverCountry => (Map, Transaction, Country),
            Self::MapTransactionHoverState => (Map, Transaction, State),
            Self::MapUserHoverCountry => (Map, User, Country),
            Self::MapUserHoverState => (Map, User, State),
            Self::TopInsuranceCountry => (Top, Insurance, Country),
            Self::TopInsuranceState => (Top, Insurance, State),
            Self::TopTransactionCountry => (Top, Transaction, Country),
            Self::TopTransactionState => (Top, Transaction, State),
            Self::TopUserCountry => (Top, User, Country),
            Self::TopUserState => (Top, User, State),
        };
        ExtractionKey::new(data_type, category, scope)
    }

    /// Output table schema
    pub fn schema(self) -> &'static TableSchema {
        match self {
            Self::AggregatedInsuranceCountry => &schemas::AGGREGATED_INSURANCE_COUNTRY,
            Self::AggregatedInsuranceState => &schemas::AGGREGATED_INSURANCE_STATE,
            Self::AggregatedTransactionCountry => &schemas::AGGREGATED_TRANSACTION_COUNTRY,
            Self::AggregatedTransactionState => &schemas::AGGREGATED_TRANSACTION_STATE,
            Self::AggregatedUserCountry => &schemas::AGGREGATED_USER_COUNTRY_TABLE,
            Self::AggregatedUserState => &schemas::AGGREGATED_USER_STATE_TABLE,
            Self::MapInsuranceHoverCountry => &schemas::MAP_INSURANCE_HOVER_COUNTRY,
            Self::MapInsuranceHoverState => &schemas::MAP_INSURANCE_HOVER_STATE,
            Self::MapTransactionHoverCountry => &schemas::MAP_TRANSACTION_HOVER_COUNTRY,
            Self::MapTransactionHoverState => &schemas::MAP_TRANSACTION_HOVER_STATE,
            Self::MapUserHoverCountry => &schemas::MAP_USER_HOVER_COUNTRY,
            Self::MapUserHoverState => &schemas::MAP_USER_HOVER_STATE,
            Self::TopInsuranceCountry => &schemas::TOP_INSURANCE_COUNTRY,
            Self::TopInsuranceState => &schemas::TOP_INSURANCE_STATE,
            Self::TopTransactionCountry => &schemas::TOP_TRANSACTION_COUNTRY,
            Self::TopTransactionState => &schemas::TOP_TRANSACTION_STATE,
            Self::TopUserCountry => &schemas::TOP_USER_COUNTRY_TABLE,
            Self::TopUserState => &schemas::TOP_USER_STATE_TABLE,
        }
    }

    /// Table name (also the extractor's display name)
    pub fn table_name(self) -> &'static str {
        self.schema().name
    }

    /// Resolve a table name back to its extractor
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.table_name() == name)
    }

    /// Flatten one parsed document into rows
    ///
    /// Fails with `SchemaMismatch` when an expected key is missing or has the
    /// wrong type; no partial rows are returned in that case.
    pub fn extract(self, payload: &JsonValue, coords: &Coordinates) -> Result<Vec<FlatRecord>> {
        match self {
            Self::AggregatedInsuranceCountry | Self::AggregatedTransactionCountry => {
                extractors::aggregated_country(self, payload, coords)
            }
            Self::AggregatedInsuranceState | Self::AggregatedTransactionState => {
                extractors::aggregated_state(self, payload, coords)
            }
            Self::AggregatedUserCountry | Self::AggregatedUserState => {
                extractors::aggregated_user(self, payload, coords)
            }
            Self::MapInsuranceHoverCountry | Self::MapTransactionHoverCountry => {
                extractors::map_hover_country(self, payload, coords)
            }
            Self::MapInsuranceHoverState | Self::MapTransactionHoverState => {
                extractors::map_hover_state(self, payload, coords)
            }
            Self::MapUserHoverCountry => extractors::map_user_country(self, payload, coords),
            Self::MapUserHoverState => extractors::map_user_state(self, payload, coords),
            Self::TopInsuranceCountry
            | Self::TopInsuranceState
            | Self::TopTransactionCountry
            | Self::TopTransactionState => extractors::top_metric(self, payload, coords),
            Self::TopUserCountry | Self::TopUserState => {
                extractors::top_user(self, payload, coords)
            }
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl Serialize for Extractor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.table_name())
    }
}

/// Look up an extractor from raw path segments
///
/// Pure mapping with no I/O. Returns `None` for data types or categories
/// that have no registered extractor; callers treat that as "skip the file".
pub fn lookup(data_type: &str, category: &str, scope: Scope) -> Option<Extractor> {
    let data_type = DataType::from_segment(data_type)?;
    let category = Category::from_segment(category)?;
    Some(Extractor::for_key(ExtractionKey::new(data_type, category, scope)))
}
