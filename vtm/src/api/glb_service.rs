//! GLB service configuration objects

use super::common::ConfigObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlbService {
    #[serde(default)]
    pub basic: GlbServiceBasic,
    #[serde(default)]
    pub log: GlbServiceLog,
}

impl ConfigObject for GlbService {
    const COLLECTION: &'static str = "glb_services";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlbServiceBasic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_monitors_needed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autorecovery: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chained_auto_failback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chained_location_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_on_failure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssec_keys: Option<Vec<DnssecKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_effect: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_resort_response: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_draining: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_settings: Option<Vec<LocationSetting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_ips_on_fail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

/// Row of `basic.dnssec_keys`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnssecKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_key: Option<Vec<String>>,
}

/// Row of `basic.location_settings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlbServiceLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
