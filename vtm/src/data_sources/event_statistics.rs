//! Event statistics data source

use super::{counter_attribute, failed_read, statistics_name_attribute};
use crate::api::EventStatistics;
use crate::attributes::{read_string, write_i64, write_string};
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
use tfplug::schema::SchemaBuilder;
use tfplug::types::{Diagnostic, DynamicValue};

const TYPE_NAME: &str = "vtm_event_statistics";

#[derive(Default)]
pub struct EventStatisticsDataSource {
    provider_data: Option<VtmProviderData>,
}

impl EventStatisticsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(name: &str, stats: &EventStatistics) -> tfplug::Result<DynamicValue> {
        let mut state = DynamicValue::empty_object();
        write_string(&mut state, "id", Some(name))?;
        write_string(&mut state, "name", Some(name))?;
        write_i64(&mut state, "matched", stats.matched)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for EventStatisticsDataSource {
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
            .description("Match count of an event configuration")
            .attribute(statistics_name_attribute("Name of the event configuration"))
            .attribute(counter_attribute(
                "matched",
                "Number of times the event configuration has matched",
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

        let name = read_string(&request.config, "name").unwrap_or_default();
        let client = &provider_data.client;
        let stats = match remote(&ctx, client.statistics::<EventStatistics>().get(&name)).await {
            Ok(stats) => stats,
            Err(e) => return failed_read(format!("Failed to read vtm_events '{}'", name), &e),
        };

        match Self::state(&name, &stats) {
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
impl DataSourceWithConfigure for EventStatisticsDataSource {
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
