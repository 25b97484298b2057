//! GLB service lifecycle against a mock traffic manager

mod common;

use common::{configured_host, not_found_body, object, row, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::resource::{
    CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest, UpdateResourceRequest,
};
use tfplug::types::{AttributePath, ClientCapabilities, Dynamic};

const PATH: &str = "/api/tm/5.2/config/active/glb_services/glb-eu";

#[tokio::test]
async fn create_puts_fresh_object_with_defaults_and_json_shadow() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", PATH)
        .match_body(Matcher::PartialJson(json!({
            "properties": {
                "basic": {
                    "algorithm": "hybrid",
                    "geo_effect": 50,
                    "domains": ["www.example.com"],
                    "chained_location_order": [],
                    "location_settings": [{"location": "paris", "ips": ["10.0.0.2"]}],
                    "dnssec_keys": []
                },
                "log": {"enabled": false}
            }
        })))
        .with_status(201)
        .with_body(r#"{"properties":{}}"#)
        .create_async()
        .await;
    let get = server.mock("GET", PATH).expect(0).create_async().await;

    let host = configured_host(&server).await;
    let config = object(&[
        ("name", string("glb-eu")),
        (
            "domains",
            Dynamic::List(vec![string("www.example.com")]),
        ),
        (
            "location_settings",
            Dynamic::List(vec![row(&[
                ("location", string("london")),
                ("ips", Dynamic::List(vec![string("10.0.0.1")])),
            ])]),
        ),
        (
            "location_settings_json",
            string(r#"[{"location":"paris","ips":["10.0.0.2"]}]"#),
        ),
    ]);
    let (planned, diags) = host
        .plan_resource("vtm_glb_service", &config)
        .await
        .unwrap();
    assert!(diags.is_empty(), "{:?}", diags);

    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .create(
            host.context(),
            CreateResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                planned_state: planned,
                config,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    put.assert_async().await;
    get.assert_async().await;

    let state = response.new_state;
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "glb-eu");
    let rows = state
        .get_list(&AttributePath::new("location_settings"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].as_map().unwrap().get("location"),
        Some(&string("paris"))
    );
}

#[tokio::test]
async fn malformed_json_shadow_blocks_plan() {
    let server = Server::new_async().await;
    let host = configured_host(&server).await;
    let config = object(&[
        ("name", string("glb-eu")),
        ("dnssec_keys_json", string("[{")),
    ]);

    let (_, diags) = host
        .plan_resource("vtm_glb_service", &config)
        .await
        .unwrap();

    assert!(!diags.is_empty());
    assert!(diags
        .iter()
        .all(|d| d.attribute == Some(AttributePath::new("dnssec_keys_json"))));
}

#[tokio::test]
async fn read_of_deleted_service_clears_state() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", PATH)
        .with_status(404)
        .with_body(not_found_body())
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .read(
            host.context(),
            ReadResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                current_state: object(&[("id", string("glb-eu")), ("name", string("glb-eu"))]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.new_state.is_none());
}

#[tokio::test]
async fn read_failure_names_the_service() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", PATH)
        .with_status(403)
        .with_body(r#"{"error_id":"auth.denied","error_text":"Permission denied"}"#)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .read(
            host.context(),
            ReadResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                current_state: object(&[("name", string("glb-eu"))]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(
        response.diagnostics[0].summary,
        "Failed to read vtm_glb_service 'glb-eu'"
    );
    assert!(response.new_state.is_some());
}

#[tokio::test]
async fn update_overlays_remote_object() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", PATH)
        .with_body(
            r#"{"properties":{"basic":{"algorithm":"geo","domains":["old.example.com"],"rules":["r1"]},"log":{"enabled":true}}}"#,
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", PATH)
        .match_body(Matcher::PartialJson(json!({
            "properties": {
                "basic": {"algorithm": "round_robin", "domains": [], "rules": []},
                "log": {"enabled": false}
            }
        })))
        .with_body(r#"{"properties":{}}"#)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let config = object(&[
        ("name", string("glb-eu")),
        ("algorithm", string("round_robin")),
    ]);
    let (planned, _) = host
        .plan_resource("vtm_glb_service", &config)
        .await
        .unwrap();

    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .update(
            host.context(),
            UpdateResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                prior_state: object(&[("id", string("glb-eu")), ("name", string("glb-eu"))]),
                planned_state: planned,
                config,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    put.assert_async().await;
    assert!(response
        .new_state
        .get_string_list(&AttributePath::new("domains"))
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn delete_tolerates_missing_service() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", PATH)
        .with_status(404)
        .with_body(not_found_body())
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .delete(
            host.context(),
            DeleteResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                prior_state: object(&[("name", string("glb-eu"))]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn dot_segment_names_fail_plan() {
    let server = Server::new_async().await;
    let host = configured_host(&server).await;

    for name in [".", ".."] {
        let (_, diags) = host
            .plan_resource("vtm_glb_service", &object(&[("name", string(name))]))
            .await
            .unwrap();
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].attribute, Some(AttributePath::new("name")));
    }
}

#[tokio::test]
async fn slash_in_name_stays_inside_collection() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/api/tm/5.2/config/active/glb_services/eu%2Fwest")
        .with_status(204)
        .create_async()
        .await;
    let collection = server
        .mock("DELETE", "/api/tm/5.2/config/active/glb_services/eu/west")
        .expect(0)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_glb_service").await.unwrap();
    let response = resource
        .delete(
            host.context(),
            DeleteResourceRequest {
                type_name: "vtm_glb_service".to_string(),
                prior_state: object(&[("name", string("eu/west"))]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    delete.assert_async().await;
    collection.assert_async().await;
}

#[tokio::test]
async fn blank_json_shadow_passes_plan() {
    let server = Server::new_async().await;
    let host = configured_host(&server).await;
    let config = object(&[
        ("name", string("glb-eu")),
        ("dnssec_keys_json", string("  \n")),
    ]);

    let (_, diags) = host
        .plan_resource("vtm_glb_service", &config)
        .await
        .unwrap();
    assert!(diags.is_empty(), "{:?}", diags);
}
