//! Read-only statistics nodes

use super::common::StatisticsObject;
use serde::Deserialize;

/// Counters of one listening IP address
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListenIpStatistics {
    #[serde(default)]
    pub bytes_in: Option<i64>,
    #[serde(default)]
    pub bytes_out: Option<i64>,
    #[serde(default)]
    pub current_conn: Option<i64>,
    #[serde(default)]
    pub max_conn: Option<i64>,
    #[serde(default)]
    pub total_requests: Option<i64>,
}

impl StatisticsObject for ListenIpStatistics {
    const COLLECTION: &'static str = "listen_ips";
}

/// Match count of one event configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventStatistics {
    #[serde(default)]
    pub matched: Option<i64>,
}

impl StatisticsObject for EventStatistics {
    const COLLECTION: &'static str = "events";
}

/// The 64-bit user counter, a global node
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserCounters64Statistics {
    #[serde(default)]
    pub counter: Option<i64>,
}

impl StatisticsObject for UserCounters64Statistics {
    const COLLECTION: &'static str = "extras/user_counters_64";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::StatisticsDocument;

    #[test]
    fn listen_ip_counters_parse() {
        let doc: StatisticsDocument<ListenIpStatistics> = serde_json::from_str(
            r#"{"statistics":{"bytes_in":1024,"bytes_out":2048,"current_conn":3,"max_conn":9,"total_requests":77}}"#,
        )
        .unwrap();
        assert_eq!(doc.statistics.bytes_in, Some(1024));
        assert_eq!(doc.statistics.total_requests, Some(77));
    }

    #[test]
    fn missing_counters_stay_absent() {
        let doc: StatisticsDocument<EventStatistics> =
            serde_json::from_str(r#"{"statistics":{}}"#).unwrap();
        assert_eq!(doc.statistics, EventStatistics::default());
    }
}
