//! Built-in attribute validators
//!
//! Validators only look at known, non-null values. Missing required
//! attributes are reported by [`Schema::validate`](crate::schema::Schema::validate).

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::Diagnostic;
use std::sync::Arc;

fn invalid(request: &ValidatorRequest, summary: String, detail: String) -> ValidatorResponse {
    ValidatorResponse {
        diagnostics: vec![Diagnostic::error(summary, detail).with_attribute(request.path.clone())],
    }
}

/// String must be one of a fixed set of values
pub struct StringOneOf {
    allowed: Vec<String>,
}

impl StringOneOf {
    pub fn create(allowed: &[&str]) -> Arc<dyn Validator> {
        Arc::new(Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of {:?}", self.allowed)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        match request.config_value.value.as_str() {
            Some(s) if !self.allowed.iter().any(|a| a == s) => invalid(
                &request,
                format!("{} must be one of {:?}", request.path, self.allowed),
                format!("Got '{}'", s),
            ),
            _ => ValidatorResponse::default(),
        }
    }
}

/// String must not be any of a fixed set of values
pub struct StringNoneOf {
    rejected: Vec<String>,
}

impl StringNoneOf {
    pub fn create(rejected: &[&str]) -> Arc<dyn Validator> {
        Arc::new(Self {
            rejected: rejected.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringNoneOf {
    fn description(&self) -> String {
        format!("value must not be any of {:?}", self.rejected)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        match request.config_value.value.as_str() {
            Some(s) if self.rejected.iter().any(|r| r == s) => invalid(
                &request,
                format!("{} must not be any of {:?}", request.path, self.rejected),
                format!("Got '{}'", s),
            ),
            _ => ValidatorResponse::default(),
        }
    }
}

/// Whole number within an inclusive range
pub struct IntBetween {
    min: i64,
    max: i64,
}

impl IntBetween {
    pub fn create(min: i64, max: i64) -> Arc<dyn Validator> {
        Arc::new(Self { min, max })
    }
}

impl Validator for IntBetween {
    fn description(&self) -> String {
        format!("value must be a whole number between {} and {}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let value = &request.config_value.value;
        match (value.as_number(), value.as_i64()) {
            (Some(n), None) => invalid(
                &request,
                format!("{} must be a whole number", request.path),
                format!("Got {}", n),
            ),
            (_, Some(i)) if i < self.min || i > self.max => invalid(
                &request,
                format!(
                    "{} must be between {} and {}",
                    request.path, self.min, self.max
                ),
                format!("Got {}", i),
            ),
            _ => ValidatorResponse::default(),
        }
    }
}

/// Whole number no smaller than `min`
pub struct IntAtLeast {
    min: i64,
}

impl IntAtLeast {
    pub fn create(min: i64) -> Arc<dyn Validator> {
        Arc::new(Self { min })
    }
}

impl Validator for IntAtLeast {
    fn description(&self) -> String {
        format!("value must be a whole number of at least {}", self.min)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let value = &request.config_value.value;
        match (value.as_number(), value.as_i64()) {
            (Some(n), None) => invalid(
                &request,
                format!("{} must be a whole number", request.path),
                format!("Got {}", n),
            ),
            (_, Some(i)) if i < self.min => invalid(
                &request,
                format!("{} must be at least {}", request.path, self.min),
                format!("Got {}", i),
            ),
            _ => ValidatorResponse::default(),
        }
    }
}

pub struct StringLength {
    min: Option<usize>,
    max: Option<usize>,
}

impl StringLength {
    pub fn create(min: Option<usize>, max: Option<usize>) -> Arc<dyn Validator> {
        Arc::new(Self { min, max })
    }
}

impl Validator for StringLength {
    fn description(&self) -> String {
        format!("string length must be within {:?}..{:?}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(s) = request.config_value.value.as_str() else {
            return ValidatorResponse::default();
        };
        if let Some(min) = self.min {
            if s.len() < min {
                return invalid(
                    &request,
                    format!("{} must have minimum length of {}", request.path, min),
                    format!("Got length {}", s.len()),
                );
            }
        }
        if let Some(max) = self.max {
            if s.len() > max {
                return invalid(
                    &request,
                    format!("{} must have maximum length of {}", request.path, max),
                    format!("Got length {}", s.len()),
                );
            }
        }
        ValidatorResponse::default()
    }
}

/// Strings with non-whitespace content must parse as a JSON document
pub struct JsonString;

impl JsonString {
    pub fn create() -> Arc<dyn Validator> {
        Arc::new(Self)
    }
}

impl Validator for JsonString {
    fn description(&self) -> String {
        "value must be valid JSON".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(s) = request
            .config_value
            .value
            .as_str()
            .filter(|s| !s.trim().is_empty())
        else {
            return ValidatorResponse::default();
        };
        match serde_json::from_str::<serde_json::Value>(s) {
            Ok(_) => ValidatorResponse::default(),
            Err(e) => invalid(
                &request,
                format!("{} must be valid JSON", request.path),
                e.to_string(),
            ),
        }
    }
}

/// Non-empty strings must compile as a regular expression
pub struct RegexString;

impl RegexString {
    pub fn create() -> Arc<dyn Validator> {
        Arc::new(Self)
    }
}

impl Validator for RegexString {
    fn description(&self) -> String {
        "value must be a valid regular expression".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Some(s) = request.config_value.value.as_str().filter(|s| !s.is_empty()) else {
            return ValidatorResponse::default();
        };
        match regex::Regex::new(s) {
            Ok(_) => ValidatorResponse::default(),
            Err(e) => invalid(
                &request,
                format!("{} must be a valid regular expression", request.path),
                e.to_string(),
            ),
        }
    }
}
