//! Typed access to top-level attributes of a configuration or state

use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use tfplug::Result;

pub fn read_string(config: &DynamicValue, name: &str) -> Option<String> {
    config
        .get(&AttributePath::new(name))
        .and_then(Dynamic::as_str)
        .map(str::to_string)
}

pub fn read_i64(config: &DynamicValue, name: &str) -> Option<i64> {
    config
        .get(&AttributePath::new(name))
        .and_then(Dynamic::as_i64)
}

pub fn read_bool(config: &DynamicValue, name: &str) -> Option<bool> {
    config
        .get(&AttributePath::new(name))
        .and_then(Dynamic::as_bool)
}

/// Overwrite `field` when the attribute has a known value; leave it alone otherwise.
pub fn assign_string(field: &mut Option<String>, config: &DynamicValue, name: &str) {
    if let Some(value) = read_string(config, name) {
        *field = Some(value);
    }
}

pub fn assign_i64(field: &mut Option<i64>, config: &DynamicValue, name: &str) {
    if let Some(value) = read_i64(config, name) {
        *field = Some(value);
    }
}

pub fn assign_bool(field: &mut Option<bool>, config: &DynamicValue, name: &str) {
    if let Some(value) = read_bool(config, name) {
        *field = Some(value);
    }
}

pub fn write_string(state: &mut DynamicValue, name: &str, value: Option<&str>) -> Result<()> {
    let value = value.map_or(Dynamic::Null, |s| Dynamic::String(s.to_string()));
    state.set_value(&AttributePath::new(name), value)
}

pub fn write_i64(state: &mut DynamicValue, name: &str, value: Option<i64>) -> Result<()> {
    let value = value.map_or(Dynamic::Null, |n| Dynamic::Number(n as f64));
    state.set_value(&AttributePath::new(name), value)
}

pub fn write_bool(state: &mut DynamicValue, name: &str, value: Option<bool>) -> Result<()> {
    state.set_value(&AttributePath::new(name), value.map_or(Dynamic::Null, Dynamic::Bool))
}

/// Absent remote lists are written as empty lists.
pub fn write_string_list(state: &mut DynamicValue, name: &str, value: Option<&[String]>) -> Result<()> {
    state.set_string_list(&AttributePath::new(name), value.unwrap_or_default())
}
