//! Core type system for tfplug
//!
//! Terraform hands the provider untyped attribute trees. [`Dynamic`] is that
//! tree, [`DynamicValue`] wraps it with path-based accessors and the wire
//! encodings, and [`Diagnostic`] is how providers report problems back.

use crate::error::{Result, TfplugError};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Sentinel used to carry unknown values through serialization.
const UNKNOWN_SENTINEL: &str = "__unknown__";

/// A Terraform value of any type.
///
/// Numbers are always `f64` to match Terraform's number type. Objects, maps
/// and nested blocks are all represented as `Map`; sets are `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Dynamic>),
    Map(HashMap<String, Dynamic>),
    /// Value not yet known (during planning)
    Unknown,
}

impl Dynamic {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integral view of a number; `None` for fractional or non-finite values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Dynamic::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Dynamic>> {
        match self {
            Dynamic::Map(m) => Some(m),
            _ => None,
        }
    }

    /// True for null, unknown and the zero value of each type.
    ///
    /// Terraform's SDK treats zero values as "not set" when asking whether an
    /// attribute was configured; the same rule is applied here.
    pub fn is_zero(&self) -> bool {
        match self {
            Dynamic::Null | Dynamic::Unknown => true,
            Dynamic::Bool(b) => !b,
            Dynamic::Number(n) => *n == 0.0,
            Dynamic::String(s) => s.is_empty(),
            Dynamic::List(l) => l.is_empty(),
            Dynamic::Map(m) => m.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Map(_) => "map",
            Dynamic::Unknown => "unknown",
        }
    }

    /// Convert to a JSON value. Integral numbers become JSON integers so the
    /// result deserializes cleanly into integer fields.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Dynamic::Null | Dynamic::Unknown => Value::Null,
            Dynamic::Bool(b) => Value::Bool(*b),
            Dynamic::Number(_) => match self.as_i64() {
                Some(i) => Value::from(i),
                None => self
                    .as_number()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            Dynamic::String(s) => Value::String(s.clone()),
            Dynamic::List(l) => Value::Array(l.iter().map(Dynamic::to_json).collect()),
            Dynamic::Map(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Dynamic::Null,
            Value::Bool(b) => Dynamic::Bool(b),
            Value::Number(n) => n.as_f64().map(Dynamic::Number).unwrap_or(Dynamic::Null),
            Value::String(s) => Dynamic::String(s),
            Value::Array(a) => Dynamic::List(a.into_iter().map(Dynamic::from_json).collect()),
            Value::Object(o) => Dynamic::Map(
                o.into_iter()
                    .map(|(k, v)| (k, Dynamic::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Build a list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dynamic::List(
            items
                .into_iter()
                .map(|s| Dynamic::String(s.into()))
                .collect(),
        )
    }
}

impl Serialize for Dynamic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            Dynamic::Number(n) => serializer.serialize_f64(*n),
            Dynamic::String(s) => serializer.serialize_str(s),
            Dynamic::List(l) => l.serialize(serializer),
            Dynamic::Map(m) => m.serialize(serializer),
            Dynamic::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
        }
    }
}

struct DynamicVisitor;

impl<'de> Visitor<'de> for DynamicVisitor {
    type Value = Dynamic;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a terraform value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Null)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<Dynamic, D::Error> {
        deserializer.deserialize_any(DynamicVisitor)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Dynamic, E> {
        Ok(Dynamic::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Dynamic, E> {
        self.visit_string(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Dynamic, E> {
        if value == UNKNOWN_SENTINEL {
            Ok(Dynamic::Unknown)
        } else {
            Ok(Dynamic::String(value))
        }
    }

    fn visit_seq<V: SeqAccess<'de>>(self, mut seq: V) -> std::result::Result<Dynamic, V::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Dynamic::List(items))
    }

    fn visit_map<V: MapAccess<'de>>(self, mut map: V) -> std::result::Result<Dynamic, V::Error> {
        let mut entries = HashMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry()? {
            entries.insert(key, value);
        }
        Ok(Dynamic::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Dynamic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DynamicVisitor)
    }
}

/// DynamicValue wraps Dynamic and provides encoding/decoding capabilities.
/// This is what gets passed between Terraform and the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    pub value: Dynamic,
}

impl DynamicValue {
    pub fn new(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self {
            value: Dynamic::Null,
        }
    }

    pub fn empty_object() -> Self {
        Self {
            value: Dynamic::Map(HashMap::new()),
        }
    }

    /// Terraform's default state encoding
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        if self.is_null() {
            return Ok(Vec::new());
        }
        rmp_serde::encode::to_vec_named(&self.value)
            .map_err(|e| TfplugError::EncodingError(format!("msgpack encoding failed: {}", e)))
    }

    pub fn decode_msgpack(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::null());
        }
        let value = rmp_serde::decode::from_slice::<Dynamic>(data)
            .map_err(|e| TfplugError::DecodingError(format!("msgpack decoding failed: {}", e)))?;
        Ok(Self { value })
    }

    /// Raw lookup; `None` when any step of the path is missing.
    pub fn get(&self, path: &AttributePath) -> Option<&Dynamic> {
        self.navigate_path(path).ok()
    }

    /// Lookup that only succeeds for configured, non-zero values.
    pub fn get_ok(&self, path: &AttributePath) -> Option<&Dynamic> {
        self.get(path).filter(|v| !v.is_zero())
    }

    pub fn get_string(&self, path: &AttributePath) -> Result<String> {
        let value = self.navigate_path(path)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }

    pub fn get_number(&self, path: &AttributePath) -> Result<f64> {
        let value = self.navigate_path(path)?;
        value.as_number().ok_or_else(|| mismatch("number", value))
    }

    pub fn get_i64(&self, path: &AttributePath) -> Result<i64> {
        let value = self.navigate_path(path)?;
        value.as_i64().ok_or_else(|| mismatch("integer", value))
    }

    pub fn get_bool(&self, path: &AttributePath) -> Result<bool> {
        let value = self.navigate_path(path)?;
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }

    pub fn get_list(&self, path: &AttributePath) -> Result<Vec<Dynamic>> {
        let value = self.navigate_path(path)?;
        value
            .as_list()
            .map(<[Dynamic]>::to_vec)
            .ok_or_else(|| mismatch("list", value))
    }

    pub fn get_string_list(&self, path: &AttributePath) -> Result<Vec<String>> {
        self.get_list(path)?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| mismatch("string", item))
            })
            .collect()
    }

    pub fn set_string(&mut self, path: &AttributePath, value: String) -> Result<()> {
        self.set_value(path, Dynamic::String(value))
    }

    pub fn set_number(&mut self, path: &AttributePath, value: f64) -> Result<()> {
        self.set_value(path, Dynamic::Number(value))
    }

    pub fn set_i64(&mut self, path: &AttributePath, value: i64) -> Result<()> {
        self.set_value(path, Dynamic::Number(value as f64))
    }

    pub fn set_bool(&mut self, path: &AttributePath, value: bool) -> Result<()> {
        self.set_value(path, Dynamic::Bool(value))
    }

    pub fn set_list(&mut self, path: &AttributePath, value: Vec<Dynamic>) -> Result<()> {
        self.set_value(path, Dynamic::List(value))
    }

    pub fn set_string_list(&mut self, path: &AttributePath, value: &[String]) -> Result<()> {
        self.set_value(path, Dynamic::string_list(value.iter().cloned()))
    }

    pub fn set_value(&mut self, path: &AttributePath, new_value: Dynamic) -> Result<()> {
        let Some((last, parents)) = path.steps.split_last() else {
            self.value = new_value;
            return Ok(());
        };

        if !matches!(self.value, Dynamic::Map(_)) {
            self.value = Dynamic::Map(HashMap::new());
        }

        let mut current = &mut self.value;
        for (idx, step) in parents.iter().enumerate() {
            let next = &path.steps[idx + 1];
            current = match (current, step) {
                (Dynamic::Map(m), AttributePathStep::AttributeName(name))
                | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => {
                    m.entry(name.clone()).or_insert_with(|| match next {
                        AttributePathStep::ElementKeyInt(_) => Dynamic::List(Vec::new()),
                        _ => Dynamic::Map(HashMap::new()),
                    })
                }
                (Dynamic::List(l), AttributePathStep::ElementKeyInt(i)) => {
                    let len = l.len();
                    l.get_mut(*i as usize).ok_or_else(|| {
                        TfplugError::Custom(format!("list index {} out of bounds ({})", i, len))
                    })?
                }
                _ => return Err(TfplugError::Custom(format!("invalid path {}", path))),
            };
        }

        match (current, last) {
            (Dynamic::Map(m), AttributePathStep::AttributeName(name))
            | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => {
                m.insert(name.clone(), new_value);
                Ok(())
            }
            (Dynamic::List(l), AttributePathStep::ElementKeyInt(i)) => {
                let len = l.len();
                let slot = l.get_mut(*i as usize).ok_or_else(|| {
                    TfplugError::Custom(format!("list index {} out of bounds ({})", i, len))
                })?;
                *slot = new_value;
                Ok(())
            }
            _ => Err(TfplugError::Custom(format!("invalid path {}", path))),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Dynamic::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.value, Dynamic::Unknown)
    }

    fn navigate_path<'a>(&'a self, path: &AttributePath) -> Result<&'a Dynamic> {
        let mut current = &self.value;

        for step in &path.steps {
            current = match (current, step) {
                (Dynamic::Map(m), AttributePathStep::AttributeName(name))
                | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => m
                    .get(name)
                    .ok_or_else(|| TfplugError::AttributeNotSet(path.to_string()))?,
                (Dynamic::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    l.get(*idx as usize).ok_or_else(|| {
                        TfplugError::Custom(format!("list index {} out of bounds", idx))
                    })?
                }
                (Dynamic::Null, _) => return Err(TfplugError::AttributeNotSet(path.to_string())),
                _ => return Err(TfplugError::Custom(format!("invalid path {}", path))),
            };
        }

        Ok(current)
    }
}

fn mismatch(expected: &str, actual: &Dynamic) -> TfplugError {
    TfplugError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

/// Path to an attribute within a DynamicValue
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![AttributePathStep::AttributeName(name.to_string())],
        }
    }

    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }

    pub fn index(mut self, idx: i64) -> Self {
        self.steps.push(AttributePathStep::ElementKeyInt(idx));
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.steps
            .push(AttributePathStep::ElementKeyString(key.to_string()));
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) if i == 0 => write!(f, "{}", name)?,
                AttributePathStep::AttributeName(name) => write!(f, ".{}", name)?,
                AttributePathStep::ElementKeyString(key) => write!(f, "[{:?}]", key)?,
                AttributePathStep::ElementKeyInt(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributePathStep {
    AttributeName(String),
    ElementKeyString(String),
    ElementKeyInt(i64),
}

/// Diagnostic represents a warning or error from the provider
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// True when any diagnostic in the slice is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// ClientCapabilities indicates Terraform client capabilities
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    pub deferral_allowed: bool,
    pub write_only_attributes_allowed: bool,
}

/// Config represents configuration values
pub type Config = DynamicValue;

/// State represents resource state values
pub type State = DynamicValue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_value_string_access() {
        let mut dv = DynamicValue::empty_object();
        dv.set_string(&AttributePath::new("name"), "test".to_string())
            .unwrap();

        let result = dv.get_string(&AttributePath::new("name")).unwrap();
        assert_eq!(result, "test");
    }

    #[test]
    fn dynamic_value_nested_access() {
        let mut dv = DynamicValue::null();
        let path = AttributePath::new("config").attribute("endpoint");
        dv.set_string(&path, "https://example.com".to_string())
            .unwrap();

        assert_eq!(dv.get_string(&path).unwrap(), "https://example.com");
    }

    #[test]
    fn get_ok_skips_zero_values() {
        let mut dv = DynamicValue::empty_object();
        dv.set_string(&AttributePath::new("empty"), String::new())
            .unwrap();
        dv.set_list(&AttributePath::new("none"), vec![]).unwrap();
        dv.set_i64(&AttributePath::new("ttl"), -1).unwrap();

        assert!(dv.get_ok(&AttributePath::new("empty")).is_none());
        assert!(dv.get_ok(&AttributePath::new("none")).is_none());
        assert!(dv.get_ok(&AttributePath::new("missing")).is_none());
        assert!(dv.get_ok(&AttributePath::new("ttl")).is_some());
    }

    #[test]
    fn string_list_accessor_rejects_mixed_lists() {
        let mut dv = DynamicValue::empty_object();
        dv.set_list(
            &AttributePath::new("mixed"),
            vec![Dynamic::String("a".into()), Dynamic::Number(1.0)],
        )
        .unwrap();

        assert!(matches!(
            dv.get_string_list(&AttributePath::new("mixed")),
            Err(TfplugError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn integral_numbers_convert_to_json_integers() {
        let value = Dynamic::Map(HashMap::from([
            ("weight".to_string(), Dynamic::Number(3.0)),
            ("ratio".to_string(), Dynamic::Number(0.5)),
        ]));

        let json = value.to_json();
        assert_eq!(json["weight"], serde_json::json!(3));
        assert!(json["weight"].is_i64());
        assert_eq!(json["ratio"], serde_json::json!(0.5));
    }

    #[test]
    fn msgpack_encoding_preserves_state() {
        let mut dv = DynamicValue::empty_object();
        dv.set_string(&AttributePath::new("name"), "glb".to_string())
            .unwrap();
        dv.set_string_list(&AttributePath::new("domains"), &["a.example.com".to_string()])
            .unwrap();

        let decoded = DynamicValue::decode_msgpack(&dv.encode_msgpack().unwrap()).unwrap();
        assert_eq!(decoded, dv);
    }

    #[test]
    fn attribute_path_display() {
        let path = AttributePath::new("location_settings").index(2).attribute("ips");
        assert_eq!(path.to_string(), "location_settings[2].ips");
    }
}
