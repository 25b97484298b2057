//! Global security settings (singleton)

use super::common::ConfigObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default)]
    pub basic: SecurityBasic,
    #[serde(default)]
    pub ssh_intrusion: SecuritySshIntrusion,
}

impl ConfigObject for Security {
    const COLLECTION: &'static str = "security";
    const SINGLETON: bool = true;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityBasic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySshIntrusion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bantime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findtime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxretry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
}
