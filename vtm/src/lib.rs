//! Terraform provider for a virtual traffic manager's REST API

pub mod api;
pub mod attributes;
pub mod data_sources;
pub mod filter;
pub mod provider_data;
pub mod resources;
pub mod shadow;

pub use provider_data::VtmProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::defaults::{EnvDefault, StaticDefault};
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::schema::{AttributeBuilder, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};
use tfplug::validator::IntAtLeast;
use tfplug::{DataSourceWithConfigure, ResourceWithConfigure};

pub const BASE_URL_ENV: &str = "VTM_BASE_URL";
pub const USERNAME_ENV: &str = "VTM_USERNAME";
pub const PASSWORD_ENV: &str = "VTM_PASSWORD";
pub const API_VERSION_ENV: &str = "VTM_API_VERSION";

#[derive(Default)]
pub struct VtmProvider {
    provider_data: Option<VtmProviderData>,
}

impl VtmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    fn provider_schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Configuration for the vTM REST API connection")
            .attribute(
                AttributeBuilder::string("base_url")
                    .description("Base URL of the REST API, e.g. https://vtm:9070")
                    .default(EnvDefault::create_required(BASE_URL_ENV))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("username")
                    .description("REST API user")
                    .default(EnvDefault::create_required(USERNAME_ENV))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("password")
                    .description("REST API password")
                    .sensitive()
                    .default(EnvDefault::create_required(PASSWORD_ENV))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_version")
                    .description("REST API version")
                    .default(EnvDefault::create(
                        API_VERSION_ENV,
                        api::DEFAULT_API_VERSION,
                    ))
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("verify_ssl_cert")
                    .description("Verify the appliance's TLS certificate")
                    .default(StaticDefault::bool(true))
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("timeout_seconds")
                    .description("Per-request timeout")
                    .validator(IntAtLeast::create(1))
                    .default(StaticDefault::number(30.0))
                    .build(),
            )
            .build()
    }

    /// Build client settings from a configuration, falling back to the environment.
    pub fn client_config(config: &DynamicValue) -> Result<api::ClientConfig, Vec<Diagnostic>> {
        let config = Self::provider_schema().apply_defaults(config);

        let mut diagnostics = vec![];
        let mut required = |name: &str, env: &str| match attributes::read_string(&config, name)
            .filter(|s| !s.is_empty())
        {
            Some(value) => value,
            None => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "{} is required (set in provider config or {} env var)",
                        name, env
                    ),
                    "",
                ));
                String::new()
            }
        };
        let base_url = required("base_url", BASE_URL_ENV);
        let username = required("username", USERNAME_ENV);
        let password = required("password", PASSWORD_ENV);
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        let mut client_config = api::ClientConfig::new(&base_url, &username, &password);
        if let Some(version) = attributes::read_string(&config, "api_version") {
            client_config.api_version = version;
        }
        if let Some(verify) = attributes::read_bool(&config, "verify_ssl_cert") {
            client_config.verify_ssl_cert = verify;
        }
        if let Some(timeout) = attributes::read_i64(&config, "timeout_seconds") {
            client_config.timeout_seconds = timeout.max(1) as u64;
        }
        Ok(client_config)
    }
}

#[async_trait]
impl Provider for VtmProvider {
    fn type_name(&self) -> &str {
        "vtm"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::provider_schema(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let client_config = match Self::client_config(&request.config) {
            Ok(config) => config,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        tracing::debug!(
            "configuring vtm provider for {} (api {})",
            client_config.base_url,
            client_config.api_version
        );
        match api::Client::new(client_config) {
            Ok(client) => {
                let data = VtmProviderData::new(client);
                self.provider_data = Some(data.clone());
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(data)),
                }
            }
            Err(e) => {
                tracing::error!("failed to create vtm client: {}", e);
                ConfigureProviderResponse {
                    diagnostics: vec![Diagnostic::error(
                        format!("Failed to create API client: {}", e),
                        "",
                    )],
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert(
            "vtm_glb_service".to_string(),
            Box::new(|| {
                Box::new(resources::GlbServiceResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "vtm_traffic_manager".to_string(),
            Box::new(|| {
                Box::new(resources::TrafficManagerResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "vtm_security".to_string(),
            Box::new(|| {
                Box::new(resources::SecurityResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
        data_sources.insert(
            "vtm_traffic_manager_list".to_string(),
            Box::new(|| {
                Box::new(data_sources::TrafficManagerListDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "vtm_listen_ip_statistics".to_string(),
            Box::new(|| {
                Box::new(data_sources::ListenIpStatisticsDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "vtm_event_statistics".to_string(),
            Box::new(|| {
                Box::new(data_sources::EventStatisticsDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "vtm_user_counters_64_statistics".to_string(),
            Box::new(|| {
                Box::new(data_sources::UserCounters64StatisticsDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources
    }
}
