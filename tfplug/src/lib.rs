//! tfplug - Terraform Plugin Framework for Rust
//!
//! The provider-facing half of a Terraform plugin: dynamic values, schemas
//! with validators and defaults, the resource / data source / provider
//! traits and an in-process host that drives them.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod host;
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use host::ProviderHost;
pub use import::import_state_passthrough_id;
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{Diagnostic, Dynamic, DynamicValue};
