//! 64-bit user counter data source; a global node with a fixed id

use super::{counter_attribute, failed_read};
use crate::api::UserCounters64Statistics;
use crate::attributes::{write_i64, write_string};
use crate::provider_data::{not_configured, VtmProviderData};
use crate::resources::remote;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource,
    DataSourceMetadataRequest, DataSourceMetadataResponse, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

const TYPE_NAME: &str = "vtm_user_counters_64_statistics";
const STATE_ID: &str = "user_counters_64";

#[derive(Default)]
pub struct UserCounters64StatisticsDataSource {
    provider_data: Option<VtmProviderData>,
}

impl UserCounters64StatisticsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(stats: &UserCounters64Statistics) -> tfplug::Result<DynamicValue> {
        let mut state = DynamicValue::empty_object();
        write_string(&mut state, "id", Some(STATE_ID))?;
        write_i64(&mut state, "counter", stats.counter)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for UserCounters64StatisticsDataSource {
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
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Value of the 64-bit user counter")
            .attribute(
                AttributeBuilder::string("id")
                    .description("Always user_counters_64")
                    .computed()
                    .build(),
            )
            .attribute(counter_attribute(
                "counter",
                "Value of the counter, set from TrafficScript",
            ))
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

        let api = provider_data.client.statistics::<UserCounters64Statistics>();
        let stats = match remote(&ctx, api.get_global()).await {
            Ok(stats) => stats,
            Err(e) => return failed_read("Failed to read vtm_user_counters_64".to_string(), &e),
        };

        match Self::state(&stats) {
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
impl DataSourceWithConfigure for UserCounters64StatisticsDataSource {
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
