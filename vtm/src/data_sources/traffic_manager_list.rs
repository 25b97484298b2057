//! Traffic manager list data source

use crate::api::TrafficManager;
use crate::attributes::{write_string, write_string_list};
use crate::filter::ListFilter;
use crate::provider_data::{not_configured, VtmProviderData};
use crate::resources::{api_diagnostic, remote};
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource,
    DataSourceMetadataRequest, DataSourceMetadataResponse, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::RegexString;

const TYPE_NAME: &str = "vtm_traffic_manager_list";
const STATE_ID: &str = "traffic_manager_list";

#[derive(Default)]
pub struct TrafficManagerListDataSource {
    provider_data: Option<VtmProviderData>,
}

impl TrafficManagerListDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(config: &DynamicValue, names: &[String]) -> tfplug::Result<DynamicValue> {
        let mut state = config.clone();
        write_string(&mut state, "id", Some(STATE_ID))?;
        write_string_list(&mut state, "object_list", Some(names))?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for TrafficManagerListDataSource {
    fn type_name(&self) -> &str {
        TYPE_NAME
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
        let filter = |name: &str, description: &str| {
            AttributeBuilder::string(name)
                .description(description)
                .optional()
                .build()
        };

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Names of the traffic managers in the cluster")
            .attribute(
                AttributeBuilder::string("id")
                    .description("Always traffic_manager_list")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string_list("object_list")
                    .description("Matching traffic manager names, in server order")
                    .computed()
                    .build(),
            )
            .attribute(filter("starts_with", "Keep names with this prefix"))
            .attribute(filter("ends_with", "Keep names with this suffix"))
            .attribute(filter("contains", "Keep names containing this text"))
            .attribute(
                AttributeBuilder::string("regex_match")
                    .description("Keep names matching this regular expression")
                    .optional()
                    .validator(RegexString::create())
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
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

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                return ReadDataSourceResponse {
                    state: request.config,
                    diagnostics: vec![not_configured()],
                }
            }
        };

        let client = &provider_data.client;
        let names = match remote(&ctx, client.config::<TrafficManager>().list()).await {
            Ok(names) => names,
            Err(e) => {
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics: vec![api_diagnostic(
                        format!("Failed to read {}", TYPE_NAME),
                        &e,
                    )],
                }
            }
        };

        let names = match ListFilter::from_config(&request.config).apply(names) {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("{}: {}", TYPE_NAME, e);
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics: vec![Diagnostic::error("Invalid regex_match", e.to_string())
                        .with_attribute(AttributePath::new("regex_match"))],
                };
            }
        };
        tracing::debug!("{} matched {} names", TYPE_NAME, names.len());

        match Self::state(&request.config, &names) {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(e) => ReadDataSourceResponse {
                state: request.config,
                diagnostics: vec![Diagnostic::error("Failed to write state", e.to_string())],
            },
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for TrafficManagerListDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let mut diagnostics = vec![];
        match VtmProviderData::from_any(request.provider_data) {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }
        ConfigureDataSourceResponse { diagnostics }
    }
}
