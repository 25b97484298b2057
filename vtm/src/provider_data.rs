//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::sync::Arc;
use tfplug::types::Diagnostic;

#[derive(Clone)]
pub struct VtmProviderData {
    pub client: Arc<Client>,
}

impl VtmProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Downcast the opaque provider data handed to `configure`
    pub fn from_any(
        provider_data: Option<Arc<dyn std::any::Any + Send + Sync>>,
    ) -> Result<Self, Diagnostic> {
        let data = provider_data.ok_or_else(|| {
            Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            )
        })?;
        data.downcast_ref::<VtmProviderData>()
            .cloned()
            .ok_or_else(|| {
                Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract VtmProviderData from provider data",
                )
            })
    }
}

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}
