//! Provider trait and related types
//!
//! Providers hand out factories instead of long-lived resource instances.
//! Each factory call yields a fresh resource which is configured with the
//! provider data returned from [`Provider::configure`].

use crate::context::Context;
use crate::data_source::DataSourceWithConfigure;
use crate::resource::ResourceWithConfigure;
use crate::schema::Schema;
use crate::types::{ClientCapabilities, Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub type ResourceFactory = Box<dyn Fn() -> Box<dyn ResourceWithConfigure> + Send + Sync>;
pub type DataSourceFactory = Box<dyn Fn() -> Box<dyn DataSourceWithConfigure> + Send + Sync>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Prefix shared by every resource and data source type name
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse;

    async fn schema(&self, ctx: Context, request: ProviderSchemaRequest) -> ProviderSchemaResponse;

    /// Build the shared client. The returned provider_data is handed to every
    /// resource and data source through their configure call.
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    fn resources(&self) -> HashMap<String, ResourceFactory>;

    fn data_sources(&self) -> HashMap<String, DataSourceFactory>;
}

pub struct ProviderMetadataRequest;

pub struct ProviderMetadataResponse {
    pub type_name: String,
}

pub struct ProviderSchemaRequest;

pub struct ProviderSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureProviderRequest {
    pub terraform_version: String,
    pub config: DynamicValue,
    pub client_capabilities: ClientCapabilities,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}
