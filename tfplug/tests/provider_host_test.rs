//! Drives a small in-memory provider through ProviderHost

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource,
    DataSourceMetadataRequest, DataSourceMetadataResponse, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::defaults::StaticDefault;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest,
    UpdateResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{AttributePath, ClientCapabilities, Diagnostic, DynamicValue};
use tfplug::validator::StringOneOf;
use tfplug::{ProviderHost, TfplugError};

type Store = Arc<Mutex<HashMap<String, String>>>;

#[derive(Default)]
struct KvProvider {
    configured: bool,
}

#[async_trait]
impl Provider for KvProvider {
    fn type_name(&self) -> &str {
        "kv"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "kv".to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: SchemaBuilder::new()
                .attribute(AttributeBuilder::string("region").required().build())
                .build(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        _request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        self.configured = true;
        let store: Store = Arc::new(Mutex::new(HashMap::new()));
        ConfigureProviderResponse {
            diagnostics: vec![],
            provider_data: Some(Arc::new(store)),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert(
            "kv_item".to_string(),
            Box::new(|| Box::new(KvItem::default()) as Box<dyn ResourceWithConfigure>),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
        data_sources.insert(
            "kv_lookup".to_string(),
            Box::new(|| Box::new(KvLookup::default()) as Box<dyn DataSourceWithConfigure>),
        );
        data_sources
    }
}

#[derive(Default)]
struct KvItem {
    store: Option<Store>,
}

#[async_trait]
impl Resource for KvItem {
    fn type_name(&self) -> &str {
        "kv_item"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: SchemaBuilder::new()
                .attribute(
                    AttributeBuilder::string("name")
                        .required()
                        .requires_replace()
                        .build(),
                )
                .attribute(
                    AttributeBuilder::string("mode")
                        .default(StaticDefault::string("static"))
                        .validator(StringOneOf::create(&["dhcp", "static"]))
                        .build(),
                )
                .build(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let name = request
            .planned_state
            .get_string(&AttributePath::new("name"))
            .unwrap();
        let mode = request
            .planned_state
            .get_string(&AttributePath::new("mode"))
            .unwrap();
        let store = self.store.clone().unwrap();
        ctx.run(async move { store.lock().unwrap().insert(name, mode) })
            .await
            .unwrap();
        CreateResourceResponse {
            new_state: request.planned_state,
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let name = request
            .current_state
            .get_string(&AttributePath::new("name"))
            .unwrap();
        let mode = self.store.as_ref().unwrap().lock().unwrap().get(&name).cloned();
        let new_state = mode.map(|mode| {
            let mut state = request.current_state.clone();
            state
                .set_string(&AttributePath::new("mode"), mode)
                .unwrap();
            state
        });
        ReadResourceResponse {
            new_state,
            diagnostics: vec![],
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.planned_state,
            diagnostics: vec![],
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let name = request
            .prior_state
            .get_string(&AttributePath::new("name"))
            .unwrap();
        self.store.as_ref().unwrap().lock().unwrap().remove(&name);
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for KvItem {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        match request
            .provider_data
            .as_ref()
            .and_then(|data| data.downcast_ref::<Store>())
        {
            Some(store) => self.store = Some(store.clone()),
            None => diagnostics.push(Diagnostic::error(
                "Invalid provider data",
                "Expected the kv store",
            )),
        }
        ConfigureResourceResponse { diagnostics }
    }
}

#[derive(Default)]
struct KvLookup {
    store: Option<Store>,
}

#[async_trait]
impl DataSource for KvLookup {
    fn type_name(&self) -> &str {
        "kv_lookup"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: SchemaBuilder::new()
                .attribute(AttributeBuilder::string("name").required().build())
                .attribute(AttributeBuilder::string("mode").computed().build())
                .build(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let name = request.config.get_string(&AttributePath::new("name")).unwrap();
        let mode = self.store.as_ref().unwrap().lock().unwrap().get(&name).cloned();
        let state = match mode {
            Some(mode) => {
                let mut state = request.config.clone();
                state
                    .set_string(&AttributePath::new("mode"), mode)
                    .unwrap();
                state
            }
            None => DynamicValue::null(),
        };
        ReadDataSourceResponse {
            state,
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for KvLookup {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        self.store = request
            .provider_data
            .as_ref()
            .and_then(|data| data.downcast_ref::<Store>())
            .cloned();
        ConfigureDataSourceResponse {
            diagnostics: vec![],
        }
    }
}

fn provider_config() -> DynamicValue {
    let mut config = DynamicValue::empty_object();
    config
        .set_string(&AttributePath::new("region"), "eu".to_string())
        .unwrap();
    config
}

fn item_config(name: &str) -> DynamicValue {
    let mut config = DynamicValue::empty_object();
    config
        .set_string(&AttributePath::new("name"), name.to_string())
        .unwrap();
    config
}

#[tokio::test]
async fn resources_require_a_configured_provider() {
    let host = ProviderHost::new(KvProvider::default());
    assert!(matches!(
        host.resource("kv_item").await,
        Err(TfplugError::ProviderNotConfigured)
    ));
}

#[tokio::test]
async fn configure_validates_provider_schema() {
    let mut host = ProviderHost::new(KvProvider::default());
    let diagnostics = host.configure(DynamicValue::empty_object()).await;
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].summary.contains("region"));
    assert!(!host.provider().configured);
}

#[tokio::test]
async fn unknown_types_are_reported() {
    let mut host = ProviderHost::new(KvProvider::default());
    assert!(host.configure(provider_config()).await.is_empty());

    assert!(matches!(
        host.resource("kv_missing").await,
        Err(TfplugError::ResourceNotFound(name)) if name == "kv_missing"
    ));
    assert!(matches!(
        host.data_source("kv_missing").await,
        Err(TfplugError::DataSourceNotFound(_))
    ));
    assert_eq!(host.resource_types(), vec!["kv_item".to_string()]);
    assert_eq!(host.data_source_types(), vec!["kv_lookup".to_string()]);
}

#[tokio::test]
async fn plan_applies_defaults_and_reports_validation_errors() {
    let host = ProviderHost::new(KvProvider::default());

    let (planned, diagnostics) = host.plan_resource("kv_item", &item_config("a")).await.unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(
        planned.get_string(&AttributePath::new("mode")).unwrap(),
        "static"
    );

    let mut bad = item_config("a");
    bad.set_string(&AttributePath::new("mode"), "bootp".to_string())
        .unwrap();
    let (_, diagnostics) = host.plan_resource("kv_item", &bad).await.unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].attribute.as_ref().unwrap().to_string(),
        "mode"
    );
}

#[tokio::test]
async fn full_lifecycle_shares_provider_data() {
    let mut host = ProviderHost::new(KvProvider::default());
    assert!(host.configure(provider_config()).await.is_empty());

    let (planned, _) = host.plan_resource("kv_item", &item_config("a")).await.unwrap();
    let resource = host.resource("kv_item").await.unwrap();
    let created = resource
        .create(
            host.context(),
            CreateResourceRequest {
                type_name: "kv_item".to_string(),
                planned_state: planned.clone(),
                config: item_config("a"),
            },
        )
        .await;
    assert!(created.diagnostics.is_empty());

    // A second instance sees the same store
    let lookup = host.data_source("kv_lookup").await.unwrap();
    let read = lookup
        .read(
            host.context(),
            ReadDataSourceRequest {
                type_name: "kv_lookup".to_string(),
                config: item_config("a"),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;
    assert_eq!(
        read.state.get_string(&AttributePath::new("mode")).unwrap(),
        "static"
    );

    let resource = host.resource("kv_item").await.unwrap();
    resource
        .delete(
            host.context(),
            DeleteResourceRequest {
                type_name: "kv_item".to_string(),
                prior_state: created.new_state.clone(),
            },
        )
        .await;
    let read = resource
        .read(
            host.context(),
            ReadResourceRequest {
                type_name: "kv_item".to_string(),
                current_state: created.new_state,
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;
    assert!(read.new_state.is_none());
}

#[test]
fn stop_cancels_host_context() {
    let host = ProviderHost::new(KvProvider::default());
    let ctx = host.context();
    host.stop();

    let result = tokio_test::block_on(ctx.run(async { 1 }));
    assert!(matches!(result, Err(TfplugError::Cancelled)));
}
