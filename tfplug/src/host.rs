//! In-process provider host
//!
//! Drives a [`Provider`] the way Terraform does: configure once, then build a
//! fresh resource or data source from its factory for every call and hand it
//! the provider data. Planning validates configuration against the schema and
//! fills in defaults.

use crate::context::Context;
use crate::data_source::{ConfigureDataSourceRequest, DataSourceWithConfigure};
use crate::error::{Result, TfplugError};
use crate::provider::{
    ConfigureProviderRequest, DataSourceFactory, Provider, ProviderSchemaRequest, ResourceFactory,
};
use crate::resource::{
    ConfigureResourceRequest, ResourceSchemaRequest, ResourceWithConfigure,
    ValidateResourceConfigRequest,
};
use crate::types::{has_errors, ClientCapabilities, Diagnostic, DynamicValue};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ProviderHost<P: Provider> {
    provider: P,
    ctx: Context,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
    resources: HashMap<String, ResourceFactory>,
    data_sources: HashMap<String, DataSourceFactory>,
}

impl<P: Provider> ProviderHost<P> {
    pub fn new(provider: P) -> Self {
        let resources = provider.resources();
        let data_sources = provider.data_sources();
        Self {
            provider,
            ctx: Context::new(),
            provider_data: None,
            resources,
            data_sources,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Context shared by every call made through this host
    pub fn context(&self) -> Context {
        self.ctx.clone()
    }

    /// Cancel in-flight and future calls
    pub fn stop(&self) {
        tracing::debug!("stopping provider {}", self.provider.type_name());
        self.ctx.cancel();
    }

    pub fn resource_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn data_source_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn configure(&mut self, config: DynamicValue) -> Vec<Diagnostic> {
        let schema = self
            .provider
            .schema(self.ctx.clone(), ProviderSchemaRequest)
            .await
            .schema;
        let mut diagnostics = schema.validate(&config);
        if has_errors(&diagnostics) {
            return diagnostics;
        }

        let response = self
            .provider
            .configure(
                self.ctx.clone(),
                ConfigureProviderRequest {
                    terraform_version: String::new(),
                    config,
                    client_capabilities: ClientCapabilities::default(),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        if !has_errors(&diagnostics) {
            tracing::debug!("provider {} configured", self.provider.type_name());
            self.provider_data = response.provider_data;
        }
        diagnostics
    }

    /// Fresh, configured resource instance for `type_name`
    pub async fn resource(&self, type_name: &str) -> Result<Box<dyn ResourceWithConfigure>> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| TfplugError::ResourceNotFound(type_name.to_string()))?;
        let provider_data = self
            .provider_data
            .clone()
            .ok_or(TfplugError::ProviderNotConfigured)?;

        let mut resource = factory();
        let response = resource
            .configure(
                self.ctx.clone(),
                ConfigureResourceRequest {
                    provider_data: Some(provider_data),
                },
            )
            .await;
        first_error(response.diagnostics)?;
        Ok(resource)
    }

    /// Fresh, configured data source instance for `type_name`
    pub async fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSourceWithConfigure>> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| TfplugError::DataSourceNotFound(type_name.to_string()))?;
        let provider_data = self
            .provider_data
            .clone()
            .ok_or(TfplugError::ProviderNotConfigured)?;

        let mut data_source = factory();
        let response = data_source
            .configure(
                self.ctx.clone(),
                ConfigureDataSourceRequest {
                    provider_data: Some(provider_data),
                },
            )
            .await;
        first_error(response.diagnostics)?;
        Ok(data_source)
    }

    /// Validate `config` and return the planned state with defaults applied
    pub async fn plan_resource(
        &self,
        type_name: &str,
        config: &DynamicValue,
    ) -> Result<(DynamicValue, Vec<Diagnostic>)> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| TfplugError::ResourceNotFound(type_name.to_string()))?;
        let resource = factory();

        let schema = resource
            .schema(self.ctx.clone(), ResourceSchemaRequest)
            .await
            .schema;
        let mut diagnostics = schema.validate(config);
        diagnostics.extend(
            resource
                .validate(
                    self.ctx.clone(),
                    ValidateResourceConfigRequest {
                        type_name: type_name.to_string(),
                        config: config.clone(),
                        client_capabilities: ClientCapabilities::default(),
                    },
                )
                .await
                .diagnostics,
        );

        Ok((schema.apply_defaults(config), diagnostics))
    }
}

fn first_error(diagnostics: Vec<Diagnostic>) -> Result<()> {
    match diagnostics.into_iter().find(Diagnostic::is_error) {
        Some(diag) => Err(TfplugError::InvalidConfiguration(format!(
            "{}: {}",
            diag.summary, diag.detail
        ))),
        None => Ok(()),
    }
}
