pub mod event_statistics;
pub mod listen_ip_statistics;
pub mod traffic_manager_list;
pub mod user_counters_64_statistics;

pub use event_statistics::EventStatisticsDataSource;
pub use listen_ip_statistics::ListenIpStatisticsDataSource;
pub use traffic_manager_list::TrafficManagerListDataSource;
pub use user_counters_64_statistics::UserCounters64StatisticsDataSource;

use crate::api::ApiError;
use crate::resources::api_diagnostic;
use tfplug::data_source::ReadDataSourceResponse;
use tfplug::schema::{Attribute, AttributeBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::StringLength;

/// Name of the statistics node to read
pub(crate) fn statistics_name_attribute(description: &str) -> Attribute {
    AttributeBuilder::string("name")
        .description(description)
        .required()
        .validator(StringLength::create(Some(1), None))
        .build()
}

pub(crate) fn counter_attribute(name: &str, description: &str) -> Attribute {
    AttributeBuilder::number(name)
        .description(description)
        .computed()
        .build()
}

/// A missing statistics node reads as a null state without error
pub(crate) fn failed_read(summary: String, err: &ApiError) -> ReadDataSourceResponse {
    if err.is_not_found() {
        tracing::debug!("statistics node not found: {}", err);
        return ReadDataSourceResponse {
            state: DynamicValue::null(),
            diagnostics: vec![],
        };
    }
    ReadDataSourceResponse {
        state: DynamicValue::null(),
        diagnostics: vec![api_diagnostic(summary, err)],
    }
}
