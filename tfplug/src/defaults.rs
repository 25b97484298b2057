//! Default value providers for attributes
//!
//! Defaults are evaluated by [`Schema::apply_defaults`](crate::schema::Schema::apply_defaults)
//! for every optional attribute that is absent or null in configuration.

use crate::schema::{Default, DefaultRequest, DefaultResponse};
use crate::types::{Dynamic, DynamicValue};
use std::env;
use std::sync::Arc;

/// StaticDefault provides a static default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn create(value: Dynamic) -> Arc<dyn Default> {
        Arc::new(Self { value })
    }

    pub fn string(value: &str) -> Arc<dyn Default> {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Arc<dyn Default> {
        Self::create(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Arc<dyn Default> {
        Self::create(Dynamic::Bool(value))
    }

    pub fn string_list(values: &[&str]) -> Arc<dyn Default> {
        Self::create(Dynamic::string_list(values.iter().copied()))
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        DefaultResponse {
            value: DynamicValue::new(self.value.clone()),
        }
    }
}

/// EnvDefault reads the default from an environment variable
pub struct EnvDefault {
    env_var: String,
    fallback: Option<String>,
}

impl EnvDefault {
    pub fn create(env_var: &str, fallback: &str) -> Arc<dyn Default> {
        Arc::new(Self {
            env_var: env_var.to_string(),
            fallback: Some(fallback.to_string()),
        })
    }

    /// Null when the variable is unset
    pub fn create_required(env_var: &str) -> Arc<dyn Default> {
        Arc::new(Self {
            env_var: env_var.to_string(),
            fallback: None,
        })
    }
}

impl Default for EnvDefault {
    fn description(&self) -> String {
        match &self.fallback {
            Some(fallback) => format!(
                "default from environment variable {} (fallback: {})",
                self.env_var, fallback
            ),
            None => format!("default from environment variable {}", self.env_var),
        }
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        let value = match env::var(&self.env_var) {
            Ok(val) if !val.is_empty() => Dynamic::String(val),
            _ => match &self.fallback {
                Some(fallback) => Dynamic::String(fallback.clone()),
                None => Dynamic::Null,
            },
        };

        DefaultResponse {
            value: DynamicValue::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;
    use serial_test::serial;

    fn request() -> DefaultRequest {
        DefaultRequest {
            path: AttributePath::new("test"),
        }
    }

    #[test]
    fn static_default_string() {
        let default = StaticDefault::string("hybrid");
        assert_eq!(
            default.default_value(request()).value.value,
            Dynamic::String("hybrid".to_string())
        );
    }

    #[test]
    fn static_default_number() {
        let default = StaticDefault::number(-1.0);
        assert_eq!(default.default_value(request()).value.value, Dynamic::Number(-1.0));
    }

    #[test]
    fn static_default_string_list() {
        let default = StaticDefault::string_list(&["*"]);
        let value = default.default_value(request()).value;
        assert_eq!(value.value, Dynamic::string_list(["*"]));
    }

    #[test]
    #[serial]
    fn env_default_with_fallback() {
        env::remove_var("TFPLUG_TEST_NONEXISTENT");
        let default = EnvDefault::create("TFPLUG_TEST_NONEXISTENT", "5.2");
        assert_eq!(
            default.default_value(request()).value.value,
            Dynamic::String("5.2".to_string())
        );
    }

    #[test]
    #[serial]
    fn env_default_with_value() {
        env::set_var("TFPLUG_TEST_VAR", "env-value");
        let default = EnvDefault::create("TFPLUG_TEST_VAR", "fallback");
        let value = default.default_value(request()).value.value;
        env::remove_var("TFPLUG_TEST_VAR");

        assert_eq!(value, Dynamic::String("env-value".to_string()));
    }

    #[test]
    #[serial]
    fn env_default_required_missing() {
        env::remove_var("TFPLUG_TEST_MISSING");
        let default = EnvDefault::create_required("TFPLUG_TEST_MISSING");
        assert_eq!(default.default_value(request()).value.value, Dynamic::Null);
    }
}
