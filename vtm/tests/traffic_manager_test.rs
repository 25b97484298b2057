//! Traffic manager resource against a mock traffic manager

mod common;

use common::{configured_host, not_found_body, object, row, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::resource::{CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest};
use tfplug::types::{AttributePath, ClientCapabilities, Dynamic};

const PATH: &str = "/api/tm/5.2/config/active/traffic_managers/tm-1";

const REMOTE: &str = r#"{
  "properties": {
    "basic": {"numberOfCPUs": 2, "location": "rack-4", "adminMasterXMLIP": "10.0.0.9"},
    "appliance": {
      "ntpservers": ["ntp.internal"],
      "if": [{"name": "eth1", "mtu": 1500}],
      "ssh_port": 2222
    },
    "snmp": {"community": "private", "allow": ["10.0.0.0/8"]}
  }
}"#;

#[tokio::test]
async fn create_updates_existing_member() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", PATH)
        .with_body(REMOTE)
        .create_async()
        .await;
    let put = server
        .mock("PUT", PATH)
        .match_body(Matcher::PartialJson(json!({
            "properties": {
                "basic": {"numberOfCPUs": 1, "location": "rack-4", "adminMasterXMLIP": "0.0.0.0"},
                "appliance": {
                    "ntpservers": [
                        "0.zeus.pool.ntp.org",
                        "1.zeus.pool.ntp.org",
                        "2.zeus.pool.ntp.org",
                        "3.zeus.pool.ntp.org"
                    ],
                    "if": [{"name": "eth0", "mtu": 9000}],
                    "ip": [],
                    "ssh_port": 22
                },
                "rest_api": {"bind_ips": ["*"], "port": 9070},
                "snmp": {"community": "public", "allow": ["all"]}
            }
        })))
        .with_body(r#"{"properties":{}}"#)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let config = object(&[
        ("name", string("tm-1")),
        (
            "appliance_if",
            Dynamic::List(vec![row(&[("name", string("eth2"))])]),
        ),
        ("appliance_if_json", string(r#"[{"name":"eth0","mtu":9000}]"#)),
    ]);
    let (planned, diags) = host
        .plan_resource("vtm_traffic_manager", &config)
        .await
        .unwrap();
    assert!(diags.is_empty(), "{:?}", diags);

    let resource = host.resource("vtm_traffic_manager").await.unwrap();
    let response = resource
        .create(
            host.context(),
            CreateResourceRequest {
                type_name: "vtm_traffic_manager".to_string(),
                planned_state: planned,
                config,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    get.assert_async().await;
    put.assert_async().await;

    let state = response.new_state;
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "tm-1");
    assert_eq!(
        state
            .get_string_list(&AttributePath::new("appliance_ntpservers"))
            .unwrap()
            .len(),
        4
    );
    let interfaces = state.get_list(&AttributePath::new("appliance_if")).unwrap();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(
        interfaces[0].as_map().unwrap().get("name"),
        Some(&string("eth0"))
    );
}

#[tokio::test]
async fn create_fails_when_member_is_unknown() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", PATH)
        .with_status(404)
        .with_body(not_found_body())
        .create_async()
        .await;
    let put = server.mock("PUT", PATH).expect(0).create_async().await;

    let host = configured_host(&server).await;
    let config = object(&[("name", string("tm-1"))]);
    let (planned, _) = host
        .plan_resource("vtm_traffic_manager", &config)
        .await
        .unwrap();

    let resource = host.resource("vtm_traffic_manager").await.unwrap();
    let response = resource
        .create(
            host.context(),
            CreateResourceRequest {
                type_name: "vtm_traffic_manager".to_string(),
                planned_state: planned,
                config,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(
        response.diagnostics[0].summary,
        "Failed to update vtm_traffic_manager 'tm-1'"
    );
    put.assert_async().await;
}

#[tokio::test]
async fn read_mirrors_every_section() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", PATH)
        .with_body(REMOTE)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_traffic_manager").await.unwrap();
    let response = resource
        .read(
            host.context(),
            ReadResourceRequest {
                type_name: "vtm_traffic_manager".to_string(),
                current_state: object(&[("name", string("tm-1"))]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.new_state.unwrap();
    assert_eq!(state.get_i64(&AttributePath::new("numberofcpus")).unwrap(), 2);
    assert_eq!(
        state.get_string(&AttributePath::new("adminmasterxmlip")).unwrap(),
        "10.0.0.9"
    );
    assert_eq!(
        state.get_i64(&AttributePath::new("appliance_ssh_port")).unwrap(),
        2222
    );
    assert_eq!(
        state.get_string(&AttributePath::new("snmp_community")).unwrap(),
        "private"
    );
    assert_eq!(
        state
            .get_string(&AttributePath::new("appliance_if_json"))
            .unwrap(),
        r#"[{"mtu":1500,"name":"eth1"}]"#
    );
}

#[tokio::test]
async fn delete_leaves_member_in_place() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let host = configured_host(&server).await;
    let resource = host.resource("vtm_traffic_manager").await.unwrap();
    let response = resource
        .delete(
            host.context(),
            DeleteResourceRequest {
                type_name: "vtm_traffic_manager".to_string(),
                prior_state: object(&[("id", string("tm-1")), ("name", string("tm-1"))]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    delete.assert_async().await;
}
