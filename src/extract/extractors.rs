//! Row extractor implementations
//!
//! Each function flattens one JSON shape family. Year, quarter and state
//! always come from the path-derived `Coordinates`.

use super::registry::Extractor;
use super::types::{FlatRecord, Scalar};
use crate::error::{Error, Result};
use crate::types::{Coordinates, JsonValue, Scope, StateName};

/// Entity lists merged into the long-form top tables, in output order
const TOP_ENTITY_TYPES: [&str; 3] = ["states", "districts", "pincodes"];

// ============================================================================
// JSON navigation
// ============================================================================

/// A position inside a payload, tracking the dotted key path for errors
struct Node<'a> {
    extractor: Extractor,
    path: String,
    value: &'a JsonValue,
}

impl<'a> Node<'a> {
    fn root(extractor: Extractor, value: &'a JsonValue) -> Self {
        Self {
            extractor,
            path: String::new(),
            value,
        }
    }

    fn label(&self) -> &str {
        if self.path.is_empty() {
            "$"
        } else {
            &self.path
        }
    }

    fn mismatch(&self, key: impl Into<String>, reason: &str) -> Error {
        Error::schema_mismatch(self.extractor.table_name(), key, reason)
    }

    fn child(&self, path: String, value: &'a JsonValue) -> Node<'a> {
        Node {
            extractor: self.extractor,
            path,
            value,
        }
    }

    /// Required object member
    fn key(&self, key: &str) -> Result<Node<'a>> {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        };

        match self.value {
            JsonValue::Object(map) => match map.get(key) {
                Some(value) => Ok(self.child(path, value)),
                None => Err(self.mismatch(path, "missing")),
            },
            _ => Err(self.mismatch(self.label(), "not an object")),
        }
    }

    /// Required array element
    fn index(&self, index: usize) -> Result<Node<'a>> {
        let path = format!("{}[{index}]", self.label());
        match self.value {
            JsonValue::Array(items) => match items.get(index) {
                Some(value) => Ok(self.child(path, value)),
                None => Err(self.mismatch(path, "missing")),
            },
            _ => Err(self.mismatch(self.label(), "not an array")),
        }
    }

    /// Elements of a required array
    fn items(&self) -> Result<Vec<Node<'a>>> {
        match self.value {
            JsonValue::Array(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, value)| self.child(format!("{}[{i}]", self.label()), value))
                .collect()),
            _ => Err(self.mismatch(self.label(), "not an array")),
        }
    }

    /// Elements of an array that may be `null`
    fn items_or_empty(&self) -> Result<Vec<Node<'a>>> {
        if self.value.is_null() {
            Ok(Vec::new())
        } else {
            self.items()
        }
    }

    /// Members of a required object, in key order
    fn entries(&self) -> Result<Vec<(&'a str, Node<'a>)>> {
        match self.value {
            JsonValue::Object(map) => Ok(map
                .iter()
                .map(|(key, value)| {
                    let path = format!("{}.{key}", self.label());
                    (key.as_str(), self.child(path, value))
                })
                .collect()),
            _ => Err(self.mismatch(self.label(), "not an object")),
        }
    }

    /// Integer value; floats are accepted when they have no fractional part
    #[allow(clippy::cast_precision_loss)]
    fn int(&self) -> Result<i64> {
        let number = match self.value {
            JsonValue::Number(n) => n,
            _ => return Err(self.mismatch(self.label(), "not a number")),
        };

        if let Some(i) = number.as_i64() {
            return Ok(i);
        }

        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
            _ => Err(self.mismatch(self.label(), "not an integer")),
        }
    }

    fn float(&self) -> Result<f64> {
        self.value
            .as_f64()
            .ok_or_else(|| self.mismatch(self.label(), "not a number"))
    }

    /// String value; numbers are rendered as text (pincodes arrive either way)
    fn text(&self) -> Result<String> {
        match self.value {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Number(n) => Ok(n.to_string()),
            _ => Err(self.mismatch(self.label(), "not a string")),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn record(extractor: Extractor, values: Vec<Scalar>) -> Result<FlatRecord> {
    FlatRecord::new(extractor.schema(), values)
}

/// State coordinate of a state-scope extractor
fn state_of(extractor: Extractor, coords: &Coordinates) -> Result<String> {
    coords
        .state
        .as_ref()
        .map(|s| s.as_str().to_string())
        .ok_or_else(|| Error::invalid_row(extractor.table_name(), "missing state coordinate"))
}

fn is_state_scope(extractor: Extractor) -> bool {
    extractor.key().scope == Scope::State
}

/// Device share as a percentage rounded to two decimals
fn percentage(share: f64) -> f64 {
    (share * 100.0 * 100.0).round() / 100.0
}

// ============================================================================
// Aggregated
// ============================================================================

/// `data.transactionData[]` at country level
pub(crate) fn aggregated_country(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let data = Node::root(extractor, payload).key("data")?;

    data.key("transactionData")?
        .items()?
        .into_iter()
        .map(|transaction| {
            let instrument = transaction.key("paymentInstruments")?.index(0)?;
            record(
                extractor,
                vec![
                    coords.year.into(),
                    coords.quarter.into(),
                    transaction.key("name")?.text()?.into(),
                    instrument.key("count")?.int()?.into(),
                    instrument.key("amount")?.float()?.into(),
                ],
            )
        })
        .collect()
}

/// `data.transactionData[]` for one state, with the reporting window
pub(crate) fn aggregated_state(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = state_of(extractor, coords)?;
    let data = Node::root(extractor, payload).key("data")?;
    let from = data.key("from")?.int()?;
    let to = data.key("to")?.int()?;

    data.key("transactionData")?
        .items()?
        .into_iter()
        .map(|transaction| {
            let instrument = transaction.key("paymentInstruments")?.index(0)?;
            record(
                extractor,
                vec![
                    state.as_str().into(),
                    coords.year.into(),
                    coords.quarter.into(),
                    from.into(),
                    to.into(),
                    transaction.key("name")?.text()?.into(),
                    instrument.key("count")?.int()?.into(),
                    instrument.key("amount")?.float()?.into(),
                ],
            )
        })
        .collect()
}

/// `data.usersByDevice[]` with the document's user totals broadcast
pub(crate) fn aggregated_user(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = if is_state_scope(extractor) {
        Some(state_of(extractor, coords)?)
    } else {
        None
    };

    let data = Node::root(extractor, payload).key("data")?;
    let aggregated = data.key("aggregated")?;
    let registered_users = aggregated.key("registeredUsers")?.int()?;
    let app_opens = aggregated.key("appOpens")?.int()?;

    data.key("usersByDevice")?
        .items_or_empty()?
        .into_iter()
        .map(|device| {
            let mut values: Vec<Scalar> = Vec::with_capacity(8);
            if let Some(state) = &state {
                values.push(state.as_str().into());
            }
            let device_values: [Scalar; 7] = [
                coords.year.into(),
                coords.quarter.into(),
                registered_users.into(),
                app_opens.into(),
                device.key("brand")?.text()?.into(),
                device.key("count")?.int()?.into(),
                percentage(device.key("percentage")?.float()?).into(),
            ];
            values.extend(device_values);
            record(extractor, values)
        })
        .collect()
}

// ============================================================================
// Map (hover)
// ============================================================================

/// `data.hoverDataList[]` keyed by state name
pub(crate) fn map_hover_country(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    Node::root(extractor, payload)
        .key("data")?
        .key("hoverDataList")?
        .items()?
        .into_iter()
        .map(|entry| {
            let metric = entry.key("metric")?.index(0)?;
            record(
                extractor,
                vec![
                    coords.year.into(),
                    coords.quarter.into(),
                    StateName::new(&entry.key("name")?.text()?).into_string().into(),
                    metric.key("count")?.int()?.into(),
                    metric.key("amount")?.float()?.into(),
                ],
            )
        })
        .collect()
}

/// `data.hoverDataList[]` keyed by district name within one state
pub(crate) fn map_hover_state(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = state_of(extractor, coords)?;

    Node::root(extractor, payload)
        .key("data")?
        .key("hoverDataList")?
        .items()?
        .into_iter()
        .map(|entry| {
            let metric = entry.key("metric")?.index(0)?;
            record(
                extractor,
                vec![
                    coords.year.into(),
                    coords.quarter.into(),
                    state.as_str().into(),
                    StateName::new(&entry.key("name")?.text()?).into_string().into(),
                    metric.key("count")?.int()?.into(),
                    metric.key("amount")?.float()?.into(),
                ],
            )
        })
        .collect()
}

/// `data.hoverData{state: {registeredUsers}}`
pub(crate) fn map_user_country(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    Node::root(extractor, payload)
        .key("data")?
        .key("hoverData")?
        .entries()?
        .into_iter()
        .map(|(name, stats)| {
            record(
                extractor,
                vec![
                    coords.year.into(),
                    coords.quarter.into(),
                    StateName::new(name).into_string().into(),
                    stats.key("registeredUsers")?.int()?.into(),
                ],
            )
        })
        .collect()
}

/// `data.hoverData{district: {registeredUsers}}` within one state
pub(crate) fn map_user_state(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = state_of(extractor, coords)?;

    Node::root(extractor, payload)
        .key("data")?
        .key("hoverData")?
        .entries()?
        .into_iter()
        .map(|(district, stats)| {
            record(
                extractor,
                vec![
                    coords.year.into(),
                    coords.quarter.into(),
                    state.as_str().into(),
                    StateName::new(district).into_string().into(),
                    stats.key("registeredUsers")?.int()?.into(),
                ],
            )
        })
        .collect()
}

// ============================================================================
// Top
// ============================================================================

/// Merge `states`, `districts` and `pincodes` into one long-form table
///
/// Every list key must be present; a `null` list contributes no rows
/// (state-level files carry `"states": null`).
fn top_entities<'a>(
    extractor: Extractor,
    payload: &'a JsonValue,
) -> Result<Vec<(&'static str, Node<'a>)>> {
    let data = Node::root(extractor, payload).key("data")?;
    let mut entities = Vec::new();
    for entity_type in TOP_ENTITY_TYPES {
        for entity in data.key(entity_type)?.items_or_empty()? {
            entities.push((entity_type, entity));
        }
    }
    Ok(entities)
}

/// Top entities carrying a `metric {type, count, amount}`
pub(crate) fn top_metric(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = if is_state_scope(extractor) {
        Some(state_of(extractor, coords)?)
    } else {
        None
    };

    top_entities(extractor, payload)?
        .into_iter()
        .map(|(entity_type, entity)| {
            let metric = entity.key("metric")?;
            let mut values: Vec<Scalar> = vec![coords.year.into(), coords.quarter.into()];
            if let Some(state) = &state {
                values.push(state.as_str().into());
            }
            let metric_values: [Scalar; 5] = [
                entity_type.into(),
                entity.key("entityName")?.text()?.into(),
                metric.key("type")?.text()?.into(),
                metric.key("count")?.int()?.into(),
                metric.key("amount")?.float()?.into(),
            ];
            values.extend(metric_values);
            record(extractor, values)
        })
        .collect()
}

/// Top entities carrying `registeredUsers`
pub(crate) fn top_user(
    extractor: Extractor,
    payload: &JsonValue,
    coords: &Coordinates,
) -> Result<Vec<FlatRecord>> {
    let state = if is_state_scope(extractor) {
        Some(state_of(extractor, coords)?)
    } else {
        None
    };

    top_entities(extractor, payload)?
        .into_iter()
        .map(|(entity_type, entity)| {
            let mut values: Vec<Scalar> = vec![coords.year.into(), coords.quarter.into()];
            if let Some(state) = &state {
                values.push(state.as_str().into());
            }
            let user_values: [Scalar; 3] = [
                entity_type.into(),
                entity.key("name")?.text()?.into(),
                entity.key("registeredUsers")?.int()?.into(),
            ];
            values.extend(user_values);
            record(extractor, values)
        })
        .collect()
}
