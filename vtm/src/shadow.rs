//! Structured-list / JSON-shadow reconciliation for table attributes
//!
//! Every table-valued field of a vTM object is exposed twice: as a set of
//! nested objects `L` and as a JSON string `L_json`. Before an object is sent
//! upstream both are collapsed into one list of rows:
//!
//! 1. a non-empty `L_json` wins and must parse as a list of rows,
//! 2. otherwise a non-empty `L` is converted row by row,
//! 3. otherwise the table is reset to empty.
//!
//! After resolution both attributes are written back from the resolved rows
//! so they agree with each other on the next plan.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use tfplug::TfplugError;
use thiserror::Error;

/// Names of the two attributes backing one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAttribute {
    pub name: &'static str,
    pub json_name: &'static str,
}

impl TableAttribute {
    pub const fn new(name: &'static str, json_name: &'static str) -> Self {
        Self { name, json_name }
    }
}

#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("{attribute} must be a JSON list of table rows: {source}")]
    InvalidJson {
        attribute: String,
        source: serde_json::Error,
    },

    #[error("{attribute} row {index} does not match the table shape: {source}")]
    InvalidRow {
        attribute: String,
        index: usize,
        source: serde_json::Error,
    },

    #[error("failed to encode {attribute}: {source}")]
    Encode {
        attribute: String,
        source: serde_json::Error,
    },

    #[error("failed to write {attribute}: {source}")]
    State {
        attribute: String,
        source: TfplugError,
    },
}

impl ShadowError {
    /// Attribute the error should be reported against
    pub fn attribute(&self) -> &str {
        match self {
            ShadowError::InvalidJson { attribute, .. }
            | ShadowError::InvalidRow { attribute, .. }
            | ShadowError::Encode { attribute, .. }
            | ShadowError::State { attribute, .. } => attribute,
        }
    }
}

/// Resolve one table from its structured rows and JSON shadow.
pub fn reconcile<Row: DeserializeOwned>(
    table: TableAttribute,
    structured: Option<&[Dynamic]>,
    json: Option<&str>,
) -> Result<Vec<Row>, ShadowError> {
    if let Some(json) = json.filter(|s| !s.trim().is_empty()) {
        return resolve_json(table.json_name, json);
    }

    match structured.filter(|rows| !rows.is_empty()) {
        Some(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(row.to_json()).map_err(|source| ShadowError::InvalidRow {
                    attribute: table.name.to_string(),
                    index,
                    source,
                })
            })
            .collect(),
        None => Ok(Vec::new()),
    }
}

/// Parse a JSON shadow string into rows.
pub fn resolve_json<Row: DeserializeOwned>(
    attribute: &str,
    json: &str,
) -> Result<Vec<Row>, ShadowError> {
    serde_json::from_str(json).map_err(|source| ShadowError::InvalidJson {
        attribute: attribute.to_string(),
        source,
    })
}

/// Resolve `table` from a configuration or planned state.
pub fn resolve_table<Row: DeserializeOwned>(
    config: &DynamicValue,
    table: TableAttribute,
) -> Result<Vec<Row>, ShadowError> {
    let structured = config
        .get(&AttributePath::new(table.name))
        .and_then(Dynamic::as_list);
    let json = config
        .get(&AttributePath::new(table.json_name))
        .and_then(Dynamic::as_str);
    reconcile(table, structured, json)
}

/// Write `rows` into both `L` and `L_json`.
pub fn write_table<Row: Serialize>(
    state: &mut DynamicValue,
    table: TableAttribute,
    rows: &[Row],
) -> Result<(), ShadowError> {
    let encode = |source: serde_json::Error| ShadowError::Encode {
        attribute: table.name.to_string(),
        source,
    };

    let values = rows
        .iter()
        .map(|row| serde_json::to_value(row).map(Dynamic::from_json))
        .collect::<Result<Vec<_>, _>>()
        .map_err(encode)?;
    let json = serde_json::to_string(rows).map_err(encode)?;

    state
        .set_list(&AttributePath::new(table.name), values)
        .map_err(|source| ShadowError::State {
            attribute: table.name.to_string(),
            source,
        })?;
    state
        .set_string(&AttributePath::new(table.json_name), json)
        .map_err(|source| ShadowError::State {
            attribute: table.json_name.to_string(),
            source,
        })
}

/// Plain string list: the configured value when non-empty, else `default`.
pub fn resolve_string_list(config: &DynamicValue, name: &str, default: &[&str]) -> Vec<String> {
    match config.get_ok(&AttributePath::new(name)).and_then(Dynamic::as_list) {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}
