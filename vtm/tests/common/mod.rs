//! Shared helpers for provider tests against a mock traffic manager

#![allow(dead_code)]

use mockito::ServerGuard;
use std::collections::HashMap;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use tfplug::ProviderHost;
use vtm::VtmProvider;

pub fn provider_config(base_url: &str) -> DynamicValue {
    let mut config = DynamicValue::empty_object();
    config
        .set_string(&AttributePath::new("base_url"), base_url.to_string())
        .unwrap();
    config
        .set_string(&AttributePath::new("username"), "admin".to_string())
        .unwrap();
    config
        .set_string(&AttributePath::new("password"), "secret".to_string())
        .unwrap();
    config
        .set_string(&AttributePath::new("api_version"), "5.2".to_string())
        .unwrap();
    config
}

/// Route provider logs through the test harness; shown only for failing tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Host whose provider points at `server`
pub async fn configured_host(server: &ServerGuard) -> ProviderHost<VtmProvider> {
    init_tracing();
    let mut host = ProviderHost::new(VtmProvider::new());
    let diags = host.configure(provider_config(&server.url())).await;
    assert!(diags.is_empty(), "configure failed: {:?}", diags);
    host
}

pub fn object(pairs: &[(&str, Dynamic)]) -> DynamicValue {
    let map: HashMap<String, Dynamic> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    DynamicValue::new(Dynamic::Map(map))
}

pub fn string(value: &str) -> Dynamic {
    Dynamic::String(value.to_string())
}

pub fn row(pairs: &[(&str, Dynamic)]) -> Dynamic {
    object(pairs).value
}

pub fn not_found_body() -> &'static str {
    r#"{"error_id":"resource.not_found","error_text":"Resource does not exist"}"#
}
