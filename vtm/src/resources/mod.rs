pub mod glb_service;
pub mod security;
pub mod traffic_manager;

pub use glb_service::GlbServiceResource;
pub use security::SecurityResource;
pub use traffic_manager::TrafficManagerResource;

use crate::api::ApiError;
use crate::shadow::ShadowError;
use std::future::Future;
use tfplug::context::Context;
use tfplug::schema::{Attribute, AttributeBuilder};
use tfplug::types::{AttributePath, Diagnostic};
use tfplug::validator::{JsonString, StringLength, StringNoneOf};
use tfplug::TfplugError;
use thiserror::Error;

/// Failure while copying a remote object into state
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Shadow(#[from] ShadowError),

    #[error("failed to write state: {0}")]
    Framework(#[from] TfplugError),
}

/// Run a REST call under the request context
pub(crate) async fn remote<T, F>(ctx: &Context, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    ctx.run(fut).await.map_err(ApiError::from)?
}

pub(crate) fn api_diagnostic(summary: String, err: &ApiError) -> Diagnostic {
    tracing::error!("{}: {}", summary, err);
    Diagnostic::error(summary, err.to_string())
}

pub(crate) fn shadow_diagnostic(err: &ShadowError) -> Diagnostic {
    Diagnostic::error(format!("Invalid value for {}", err.attribute()), err.to_string())
        .with_attribute(AttributePath::new(err.attribute()))
}

pub(crate) fn state_diagnostic(err: &StateError) -> Diagnostic {
    match err {
        StateError::Shadow(err) => shadow_diagnostic(err),
        StateError::Framework(err) => Diagnostic::error("Failed to write state", err.to_string()),
    }
}

pub(crate) fn name_attribute(description: &str) -> Attribute {
    AttributeBuilder::string("name")
        .description(description)
        .required()
        .requires_replace()
        .validator(StringLength::create(Some(1), None))
        .validator(StringNoneOf::create(&[".", ".."]))
        .build()
}

pub(crate) fn id_attribute() -> Attribute {
    AttributeBuilder::string("id")
        .description("Identifier of the object")
        .computed()
        .build()
}

/// Structured view of a table; written back on every apply
pub(crate) fn table_attribute(name: &str, description: &str, rows: Vec<Attribute>) -> Attribute {
    AttributeBuilder::nested_set(name, rows)
        .description(description)
        .optional()
        .computed()
        .build()
}

/// JSON view of a table; wins over the structured view when non-empty
pub(crate) fn json_attribute(name: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description("JSON encoded rows; takes precedence over the structured attribute")
        .optional()
        .computed()
        .validator(JsonString::create())
        .build()
}

/// List attribute that resets to `[]` when unset
pub(crate) fn list_attribute(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string_list(name)
        .description(description)
        .optional()
        .computed()
        .build()
}
