//! Table schema definitions for every registered extractor

use super::types::{Column, TableSchema};

// =============================================================================
// Shared column layouts
// =============================================================================

const AGGREGATED_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("name"),
    Column::int("count"),
    Column::float("amount"),
];

const AGGREGATED_STATE: &[Column] = &[
    Column::text("state"),
    Column::int("year"),
    Column::int("quarter"),
    Column::int("from_timestamp"),
    Column::int("to_timestamp"),
    Column::text("type_of_transaction"),
    Column::int("number_of_transactions"),
    Column::float("total_amount"),
];

const AGGREGATED_USER_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::int("registered_users"),
    Column::int("total_open_apps"),
    Column::text("phone_brand"),
    Column::int("phone_count"),
    Column::float("percentage"),
];

const AGGREGATED_USER_STATE: &[Column] = &[
    Column::text("state"),
    Column::int("year"),
    Column::int("quarter"),
    Column::int("registered_users"),
    Column::int("total_open_apps"),
    Column::text("phone_brand"),
    Column::int("phone_count"),
    Column::float("percentage"),
];

const MAP_HOVER_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::int("total_transactions_count"),
    Column::float("total_transactions_amount"),
];

const MAP_HOVER_STATE: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::text("districts_name"),
    Column::int("total_transactions_count"),
    Column::float("total_transactions_amount"),
];

const MAP_USER_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::int("registered_users"),
];

const MAP_USER_STATE: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::text("districts_name"),
    Column::int("registered_users"),
];

const TOP_METRIC_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("entity_type"),
    Column::text("entity_name"),
    Column::text("transaction_type"),
    Column::int("count"),
    Column::float("amount"),
];

const TOP_METRIC_STATE: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::text("entity_type"),
    Column::text("entity_name"),
    Column::text("transaction_type"),
    Column::int("count"),
    Column::float("amount"),
];

const TOP_USER_COUNTRY: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("entity_type"),
    Column::text("entity_name"),
    Column::int("registered_users"),
];

const TOP_USER_STATE: &[Column] = &[
    Column::int("year"),
    Column::int("quarter"),
    Column::text("state"),
    Column::text("entity_type"),
    Column::text("entity_name"),
    Column::int("registered_users"),
];

// =============================================================================
// Aggregated
// =============================================================================

pub static AGGREGATED_INSURANCE_COUNTRY: TableSchema = TableSchema {
    name: "aggregated-insurance-country",
    columns: AGGREGATED_COUNTRY,
};

pub static AGGREGATED_INSURANCE_STATE: TableSchema = TableSchema {
    name: "aggregated-insurance-state",
    columns: AGGREGATED_STATE,
};

pub static AGGREGATED_TRANSACTION_COUNTRY: TableSchema = TableSchema {
    name: "aggregated-transaction-country",
    columns: AGGREGATED_COUNTRY,
};

pub static AGGREGATED_TRANSACTION_STATE: TableSchema = TableSchema {
    name: "aggregated-transaction-state",
    columns: AGGREGATED_STATE,
};

pub static AGGREGATED_USER_COUNTRY_TABLE: TableSchema = TableSchema {
    name: "aggregated-user-country",
    columns: AGGREGATED_USER_COUNTRY,
};

pub static AGGREGATED_USER_STATE_TABLE: TableSchema = TableSchema {
    name: "aggregated-user-state",
    columns: AGGREGATED_USER_STATE,
};

// =============================================================================
// Map (hover)
// =============================================================================

pub static MAP_INSURANCE_HOVER_COUNTRY: TableSchema = TableSchema {
    name: "map-insurance-hover-country",
    columns: MAP_HOVER_COUNTRY,
};

pub static MAP_INSURANCE_HOVER_STATE: TableSchema = TableSchema {
    name: "map-insurance-hover-state",
    columns: MAP_HOVER_STATE,
};

pub static MAP_TRANSACTION_HOVER_COUNTRY: TableSchema = TableSchema {
    name: "map-transaction-hover-country",
    columns: MAP_HOVER_COUNTRY,
};

pub static MAP_TRANSACTION_HOVER_STATE: TableSchema = TableSchema {
    name: "map-transaction-hover-state",
    columns: MAP_HOVER_STATE,
};

pub static MAP_USER_HOVER_COUNTRY: TableSchema = TableSchema {
    name: "map-user-hover-country",
    columns: MAP_USER_COUNTRY,
};

pub static MAP_USER_HOVER_STATE: TableSchema = TableSchema {
    name: "map-user-hover-state",
    columns: MAP_USER_STATE,
};

// =============================================================================
// Top
// =============================================================================

pub static TOP_INSURANCE_COUNTRY: TableSchema = TableSchema {
    name: "top-insurance-country",
    columns: TOP_METRIC_COUNTRY,
};

pub static TOP_INSURANCE_STATE: TableSchema = TableSchema {
    name: "top-insurance-state",
    columns: TOP_METRIC_STATE,
};

pub static TOP_TRANSACTION_COUNTRY: TableSchema = TableSchema {
    name: "top-transaction-country",
    columns: TOP_METRIC_COUNTRY,
};

pub static TOP_TRANSACTION_STATE: TableSchema = TableSchema {
    name: "top-transaction-state",
    columns: TOP_METRIC_STATE,
};

pub static TOP_USER_COUNTRY_TABLE: TableSchema = TableSchema {
    name: "top-user-country",
    columns: TOP_USER_COUNTRY,
};

pub static TOP_USER_STATE_TABLE: TableSchema = TableSchema {
    name: "top-user-state",
    columns: TOP_USER_STATE,
};
