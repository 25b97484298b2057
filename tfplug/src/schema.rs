//! Schema types and builders for tfplug
//!
//! Schemas describe the attributes of providers, resources and data sources.
//! Besides describing types, a schema knows how to validate a configuration
//! against its validators and how to fill in documented defaults.

use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use std::collections::HashMap;
use std::sync::Arc;

/// AttributeType mirrors Terraform's type system
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Set(Box<AttributeType>),
    Map(Box<AttributeType>),
    Object(HashMap<String, AttributeType>),
}

impl AttributeType {
    pub fn string_list() -> Self {
        AttributeType::List(Box::new(AttributeType::String))
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    /// Increment when schema changes require state migration
    pub version: i64,
    pub block: Block,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub description: String,
}

#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value forces the resource to be replaced
    pub requires_replace: bool,
    pub validators: Vec<Arc<dyn Validator>>,
    pub default: Option<Arc<dyn Default>>,
    pub nested_type: Option<NestedType>,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("requires_replace", &self.requires_replace)
            .field(
                "validators",
                &self
                    .validators
                    .iter()
                    .map(|v| v.description())
                    .collect::<Vec<_>>(),
            )
            .field("default", &self.default.as_ref().map(|d| d.description()))
            .field("nested_type", &self.nested_type)
            .finish()
    }
}

/// Attributes nested inside a list, set or single object attribute
#[derive(Debug, Clone)]
pub struct NestedType {
    pub attributes: Vec<Attribute>,
    pub nesting: ObjectNestingMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectNestingMode {
    Single,
    List,
    Set,
}

/// Validator checks a configured attribute value
pub trait Validator: Send + Sync {
    fn description(&self) -> String;
    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse;
}

pub struct ValidatorRequest {
    pub config_value: DynamicValue,
    pub path: AttributePath,
}

#[derive(Default)]
pub struct ValidatorResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Default provides a value for an optional attribute that was not configured
pub trait Default: Send + Sync {
    fn description(&self) -> String;
    fn default_value(&self, request: DefaultRequest) -> DefaultResponse;
}

pub struct DefaultRequest {
    pub path: AttributePath,
}

pub struct DefaultResponse {
    pub value: DynamicValue,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.iter().find(|a| a.name == name)
    }

    /// Run required checks and validators against a configuration
    pub fn validate(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        validate_attributes(
            &self.block.attributes,
            &config.value,
            &AttributePath::root(),
            &mut diagnostics,
        );
        diagnostics
    }

    /// Return a copy of `config` with defaults filled in for every optional
    /// attribute that is absent or null, including attributes of nested rows.
    pub fn apply_defaults(&self, config: &DynamicValue) -> DynamicValue {
        let mut value = config.value.clone();
        if matches!(value, Dynamic::Null) {
            value = Dynamic::Map(HashMap::new());
        }
        fill_defaults(&self.block.attributes, &mut value, &AttributePath::root());
        DynamicValue::new(value)
    }
}

fn validate_attributes(
    attributes: &[Attribute],
    object: &Dynamic,
    base: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attr in attributes {
        let path = base.clone().attribute(&attr.name);
        let value = object.as_map().and_then(|m| m.get(&attr.name));

        match value {
            None | Some(Dynamic::Null) => {
                if attr.required {
                    diagnostics.push(
                        Diagnostic::error(
                            format!("Missing required attribute '{}'", attr.name),
                            format!("The attribute '{}' must be set", path),
                        )
                        .with_attribute(path),
                    );
                }
            }
            Some(Dynamic::Unknown) => {}
            Some(value) => {
                for validator in &attr.validators {
                    let response = validator.validate(ValidatorRequest {
                        config_value: DynamicValue::new(value.clone()),
                        path: path.clone(),
                    });
                    diagnostics.extend(response.diagnostics);
                }
                if let (Some(nested), Some(rows)) = (&attr.nested_type, value.as_list()) {
                    for (idx, row) in rows.iter().enumerate() {
                        validate_attributes(
                            &nested.attributes,
                            row,
                            &path.clone().index(idx as i64),
                            diagnostics,
                        );
                    }
                }
            }
        }
    }
}

fn fill_defaults(attributes: &[Attribute], object: &mut Dynamic, base: &AttributePath) {
    let Dynamic::Map(map) = object else {
        return;
    };

    for attr in attributes {
        let path = base.clone().attribute(&attr.name);
        let missing = matches!(map.get(&attr.name), None | Some(Dynamic::Null));

        if missing {
            if let Some(default) = &attr.default {
                let response = default.default_value(DefaultRequest { path: path.clone() });
                map.insert(attr.name.clone(), response.value.value);
            }
            continue;
        }

        if let (Some(nested), Some(Dynamic::List(rows))) =
            (&attr.nested_type, map.get_mut(&attr.name))
        {
            for (idx, row) in rows.iter_mut().enumerate() {
                fill_defaults(&nested.attributes, row, &path.clone().index(idx as i64));
            }
        }
    }
}

/// Fluent builder for attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                requires_replace: false,
                validators: Vec::new(),
                default: None,
                nested_type: None,
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn string_list(name: &str) -> Self {
        Self::new(name, AttributeType::string_list())
    }

    /// A set of objects whose fields are described by `attributes`
    pub fn nested_set(name: &str, attributes: Vec<Attribute>) -> Self {
        let object = AttributeType::Object(
            attributes
                .iter()
                .map(|a| (a.name.clone(), a.r#type.clone()))
                .collect(),
        );
        Self::new(name, AttributeType::Set(Box::new(object))).nested_type(NestedType {
            attributes,
            nesting: ObjectNestingMode::Set,
        })
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.attribute.requires_replace = true;
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    /// Setting a default makes the attribute optional and computed
    pub fn default(mut self, default: Arc<dyn Default>) -> Self {
        self.attribute.default = Some(default);
        self.attribute.optional = true;
        self.attribute.required = false;
        self.attribute.computed = true;
        self
    }

    pub fn nested_type(mut self, nested: NestedType) -> Self {
        self.attribute.nested_type = Some(nested);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// Fluent builder for schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                block: Block {
                    attributes: Vec::new(),
                    description: String::new(),
                },
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl std::default::Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
