//! Traffic manager (cluster member) configuration objects

use super::common::ConfigObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManager {
    #[serde(default)]
    pub basic: TrafficManagerBasic,
    #[serde(default)]
    pub appliance: TrafficManagerAppliance,
    #[serde(default)]
    pub cluster_comms: TrafficManagerClusterComms,
    #[serde(default)]
    pub ec2: TrafficManagerEc2,
    #[serde(default)]
    pub fault_tolerance: TrafficManagerFaultTolerance,
    #[serde(default)]
    pub iptables: TrafficManagerIptables,
    #[serde(default)]
    pub iptrans: TrafficManagerIptrans,
    #[serde(default)]
    pub java: TrafficManagerJava,
    #[serde(default)]
    pub remote_licensing: TrafficManagerRemoteLicensing,
    #[serde(default)]
    pub rest_api: TrafficManagerRestApi,
    #[serde(default)]
    pub snmp: TrafficManagerSnmp,
}

impl ConfigObject for TrafficManager {
    const COLLECTION: &'static str = "traffic_managers";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerBasic {
    #[serde(
        rename = "adminMasterXMLIP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adminmasterxmlip: Option<String>,
    #[serde(
        rename = "adminSlaveXMLIP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adminslavexmlip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_card: Option<Vec<ApplianceCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_sysctl: Option<Vec<ApplianceSysctl>>,
    #[serde(
        rename = "authenticationServerIP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub authenticationserverip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_aptimizer_threads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_children: Option<i64>,
    #[serde(
        rename = "numberOfCPUs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub numberofcpus: Option<i64>,
    #[serde(
        rename = "restServerPort",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restserverport: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trafficip: Option<Vec<Trafficip>>,
    #[serde(
        rename = "updaterIP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updaterip: Option<String>,
}

/// Row of `basic.appliance_card`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Row of `basic.appliance_sysctl`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceSysctl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysctl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Row of `basic.trafficip`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trafficip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerAppliance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_kpti: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_ipv4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<Host>>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<Interface>>,
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_lan_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_lan_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_lan_gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_lan_ipsrc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_lan_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_forwarding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_forwarding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licence_agreed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manageazureroutes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managedpa: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manageec2conf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manageiptrans: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managereservedports: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managereturnpath: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manageservices: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managevpcconf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntpservers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_password_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlans: Option<Vec<String>>,
}

/// Row of `appliance.hosts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Row of `appliance.if`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoneg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bond: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
}

/// Row of `appliance.ip`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isexternal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Row of `appliance.routes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gw: Option<String>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerClusterComms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerEc2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trafficips_public_enis: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerFaultTolerance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_router_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lss_dedicated_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ospfv2_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ospfv2_neighbor_addrs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerIptables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerIptrans {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwmark: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iptables_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_table: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerJava {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerRemoteLicensing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerRestApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficManagerSnmp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priv_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ConfigDocument;

    #[test]
    fn maps_mixed_case_wire_keys() {
        let doc: ConfigDocument<TrafficManager> = serde_json::from_str(
            r#"{"properties":{"basic":{"adminMasterXMLIP":"10.0.0.1","numberOfCPUs":4,"restServerPort":11003}}}"#,
        )
        .unwrap();

        let basic = doc.properties.basic;
        assert_eq!(basic.adminmasterxmlip.as_deref(), Some("10.0.0.1"));
        assert_eq!(basic.numberofcpus, Some(4));
        assert_eq!(basic.restserverport, Some(11003));
        assert!(basic.updaterip.is_none());
    }

    #[test]
    fn keyword_keys_round_trip() {
        let json = serde_json::json!({
            "appliance": {
                "if": [{"name": "eth0", "mtu": 9000}],
                "ip": [{"name": "eth0", "addr": "10.0.0.2", "mask": "255.255.255.0"}],
                "routes": [{"name": "default", "if": "eth0", "gw": "10.0.0.254", "mask": "0.0.0.0"}]
            }
        });
        let tm: TrafficManager = serde_json::from_value(json).unwrap();
        let interfaces = tm.appliance.interfaces.as_ref().unwrap();
        assert_eq!(interfaces[0].mtu, Some(9000));
        let routes = tm.appliance.routes.as_ref().unwrap();
        assert_eq!(routes[0].interface.as_deref(), Some("eth0"));

        let back = serde_json::to_value(&tm).unwrap();
        assert_eq!(back["appliance"]["if"][0]["name"], "eth0");
        assert_eq!(back["appliance"]["routes"][0]["if"], "eth0");
        assert!(back["snmp"].as_object().unwrap().is_empty());
    }
}
