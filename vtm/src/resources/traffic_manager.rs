//! Traffic manager resource implementation
//!
//! Traffic managers are cluster members; they are never created or removed
//! through the API. Create and update both fetch the existing object, overlay
//! the planned values and write it back. Delete only forgets the object.

use super::{
    api_diagnostic, id_attribute, json_attribute, list_attribute, name_attribute, remote,
    shadow_diagnostic, state_diagnostic, table_attribute, StateError,
};
use crate::api::traffic_manager::{
    Address, ApplianceCard, ApplianceSysctl, Host, Interface, Route, Trafficip,
};
use crate::api::TrafficManager;
use crate::attributes::{
    assign_bool, assign_i64, assign_string, read_string, write_bool, write_i64, write_string,
    write_string_list,
};
use crate::provider_data::{not_configured, VtmProviderData};
use crate::shadow::{resolve_string_list, resolve_table, write_table, ShadowError, TableAttribute};
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, SchemaBuilder, Validator};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::{IntAtLeast, IntBetween, StringOneOf};

const TYPE_NAME: &str = "vtm_traffic_manager";

const APPLIANCE_CARD: TableAttribute =
    TableAttribute::new("appliance_card", "appliance_card_json");
const APPLIANCE_SYSCTL: TableAttribute =
    TableAttribute::new("appliance_sysctl", "appliance_sysctl_json");
const TRAFFICIP: TableAttribute = TableAttribute::new("trafficip", "trafficip_json");
const APPLIANCE_HOSTS: TableAttribute =
    TableAttribute::new("appliance_hosts", "appliance_hosts_json");
const APPLIANCE_IF: TableAttribute = TableAttribute::new("appliance_if", "appliance_if_json");
const APPLIANCE_IP: TableAttribute = TableAttribute::new("appliance_ip", "appliance_ip_json");
const APPLIANCE_ROUTES: TableAttribute =
    TableAttribute::new("appliance_routes", "appliance_routes_json");

const NTP_SERVERS: [&str; 4] = [
    "0.zeus.pool.ntp.org",
    "1.zeus.pool.ntp.org",
    "2.zeus.pool.ntp.org",
    "3.zeus.pool.ntp.org",
];

/// One scalar or list attribute and the object field behind it
enum Field<'a> {
    Text(&'static str, &'a mut Option<String>),
    Int(&'static str, &'a mut Option<i64>),
    Bool(&'static str, &'a mut Option<bool>),
    /// Plain string list with the value it resets to when unset
    List(&'static str, &'a mut Option<Vec<String>>, &'static [&'static str]),
}

fn fields(tm: &mut TrafficManager) -> Vec<Field<'_>> {
    use Field::{Bool, Int, List, Text};
    vec![
        Text("adminmasterxmlip", &mut tm.basic.adminmasterxmlip),
        Text("adminslavexmlip", &mut tm.basic.adminslavexmlip),
        Text("authenticationserverip", &mut tm.basic.authenticationserverip),
        Text("cloud_platform", &mut tm.basic.cloud_platform),
        Text("location", &mut tm.basic.location),
        Text("nameip", &mut tm.basic.nameip),
        Int("num_aptimizer_threads", &mut tm.basic.num_aptimizer_threads),
        Int("num_children", &mut tm.basic.num_children),
        Int("numberofcpus", &mut tm.basic.numberofcpus),
        Int("restserverport", &mut tm.basic.restserverport),
        Text("updaterip", &mut tm.basic.updaterip),
        Bool("appliance_disable_kpti", &mut tm.appliance.disable_kpti),
        Text("appliance_gateway_ipv4", &mut tm.appliance.gateway_ipv4),
        Text("appliance_gateway_ipv6", &mut tm.appliance.gateway_ipv6),
        Text("appliance_hostname", &mut tm.appliance.hostname),
        Bool("appliance_ipmi_lan_access", &mut tm.appliance.ipmi_lan_access),
        Text("appliance_ipmi_lan_addr", &mut tm.appliance.ipmi_lan_addr),
        Text("appliance_ipmi_lan_gateway", &mut tm.appliance.ipmi_lan_gateway),
        Text("appliance_ipmi_lan_ipsrc", &mut tm.appliance.ipmi_lan_ipsrc),
        Text("appliance_ipmi_lan_mask", &mut tm.appliance.ipmi_lan_mask),
        Bool("appliance_ipv4_forwarding", &mut tm.appliance.ipv4_forwarding),
        Bool("appliance_ipv6_forwarding", &mut tm.appliance.ipv6_forwarding),
        Bool("appliance_licence_agreed", &mut tm.appliance.licence_agreed),
        Bool("appliance_manageazureroutes", &mut tm.appliance.manageazureroutes),
        Bool("appliance_managedpa", &mut tm.appliance.managedpa),
        Bool("appliance_manageec2conf", &mut tm.appliance.manageec2conf),
        Bool("appliance_manageiptrans", &mut tm.appliance.manageiptrans),
        Bool("appliance_managereservedports", &mut tm.appliance.managereservedports),
        Bool("appliance_managereturnpath", &mut tm.appliance.managereturnpath),
        Bool("appliance_manageservices", &mut tm.appliance.manageservices),
        Bool("appliance_managevpcconf", &mut tm.appliance.managevpcconf),
        List("appliance_name_servers", &mut tm.appliance.name_servers, &[]),
        List("appliance_ntpservers", &mut tm.appliance.ntpservers, &NTP_SERVERS),
        List("appliance_search_domains", &mut tm.appliance.search_domains, &[]),
        Bool("appliance_ssh_enabled", &mut tm.appliance.ssh_enabled),
        Bool("appliance_ssh_password_allowed", &mut tm.appliance.ssh_password_allowed),
        Int("appliance_ssh_port", &mut tm.appliance.ssh_port),
        Text("appliance_timezone", &mut tm.appliance.timezone),
        List("appliance_vlans", &mut tm.appliance.vlans, &[]),
        Bool("cluster_comms_allow_update", &mut tm.cluster_comms.allow_update),
        Text("cluster_comms_bind_ip", &mut tm.cluster_comms.bind_ip),
        Text("cluster_comms_external_ip", &mut tm.cluster_comms.external_ip),
        Int("cluster_comms_port", &mut tm.cluster_comms.port),
        List("ec2_trafficips_public_enis", &mut tm.ec2.trafficips_public_enis, &[]),
        Text("fault_tolerance_bgp_router_id", &mut tm.fault_tolerance.bgp_router_id),
        List(
            "fault_tolerance_lss_dedicated_ips",
            &mut tm.fault_tolerance.lss_dedicated_ips,
            &[],
        ),
        Text("fault_tolerance_ospfv2_ip", &mut tm.fault_tolerance.ospfv2_ip),
        List(
            "fault_tolerance_ospfv2_neighbor_addrs",
            &mut tm.fault_tolerance.ospfv2_neighbor_addrs,
            &["%gateway%"],
        ),
        Bool("iptables_config_enabled", &mut tm.iptables.config_enabled),
        Int("iptrans_fwmark", &mut tm.iptrans.fwmark),
        Bool("iptrans_iptables_enabled", &mut tm.iptrans.iptables_enabled),
        Int("iptrans_routing_table", &mut tm.iptrans.routing_table),
        Int("java_port", &mut tm.java.port),
        Text(
            "remote_licensing_email_address",
            &mut tm.remote_licensing.email_address,
        ),
        Text("remote_licensing_message", &mut tm.remote_licensing.message),
        List("rest_api_bind_ips", &mut tm.rest_api.bind_ips, &["*"]),
        Int("rest_api_port", &mut tm.rest_api.port),
        List("snmp_allow", &mut tm.snmp.allow, &["all"]),
        Text("snmp_auth_password", &mut tm.snmp.auth_password),
        Text("snmp_bind_ip", &mut tm.snmp.bind_ip),
        Text("snmp_community", &mut tm.snmp.community),
        Bool("snmp_enabled", &mut tm.snmp.enabled),
        Text("snmp_hash_algorithm", &mut tm.snmp.hash_algorithm),
        Text("snmp_port", &mut tm.snmp.port),
        Text("snmp_priv_password", &mut tm.snmp.priv_password),
        Text("snmp_security_level", &mut tm.snmp.security_level),
        Text("snmp_username", &mut tm.snmp.username),
    ]
}

#[derive(Default)]
pub struct TrafficManagerResource {
    provider_data: Option<VtmProviderData>,
}

impl TrafficManagerResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `object` with the planned values
    fn apply_config(object: &mut TrafficManager, config: &DynamicValue) -> Result<(), ShadowError> {
        object.basic.appliance_card = Some(resolve_table(config, APPLIANCE_CARD)?);
        object.basic.appliance_sysctl = Some(resolve_table(config, APPLIANCE_SYSCTL)?);
        object.basic.trafficip = Some(resolve_table(config, TRAFFICIP)?);
        object.appliance.hosts = Some(resolve_table(config, APPLIANCE_HOSTS)?);
        object.appliance.interfaces = Some(resolve_table(config, APPLIANCE_IF)?);
        object.appliance.addresses = Some(resolve_table(config, APPLIANCE_IP)?);
        object.appliance.routes = Some(resolve_table(config, APPLIANCE_ROUTES)?);

        for field in fields(object) {
            match field {
                Field::Text(attr, value) => assign_string(value, config, attr),
                Field::Int(attr, value) => assign_i64(value, config, attr),
                Field::Bool(attr, value) => assign_bool(value, config, attr),
                Field::List(attr, value, default) => {
                    *value = Some(resolve_string_list(config, attr, default))
                }
            }
        }
        Ok(())
    }

    fn write_tables(state: &mut DynamicValue, object: &TrafficManager) -> Result<(), ShadowError> {
        let basic = &object.basic;
        write_table(
            state,
            APPLIANCE_CARD,
            basic.appliance_card.as_deref().unwrap_or_default(),
        )?;
        write_table(
            state,
            APPLIANCE_SYSCTL,
            basic.appliance_sysctl.as_deref().unwrap_or_default(),
        )?;
        write_table(state, TRAFFICIP, basic.trafficip.as_deref().unwrap_or_default())?;

        let appliance = &object.appliance;
        write_table(
            state,
            APPLIANCE_HOSTS,
            appliance.hosts.as_deref().unwrap_or_default(),
        )?;
        write_table(
            state,
            APPLIANCE_IF,
            appliance.interfaces.as_deref().unwrap_or_default(),
        )?;
        write_table(
            state,
            APPLIANCE_IP,
            appliance.addresses.as_deref().unwrap_or_default(),
        )?;
        write_table(
            state,
            APPLIANCE_ROUTES,
            appliance.routes.as_deref().unwrap_or_default(),
        )
    }

    /// Mirror the whole remote object into state
    fn write_state(
        state: &mut DynamicValue,
        name: &str,
        object: &TrafficManager,
    ) -> Result<(), StateError> {
        write_string(state, "id", Some(name))?;
        write_string(state, "name", Some(name))?;

        let mut object = object.clone();
        Self::write_tables(state, &object)?;
        for field in fields(&mut object) {
            match field {
                Field::Text(attr, value) => write_string(state, attr, value.as_deref())?,
                Field::Int(attr, value) => write_i64(state, attr, *value)?,
                Field::Bool(attr, value) => write_bool(state, attr, *value)?,
                Field::List(attr, value, _) => write_string_list(state, attr, value.as_deref())?,
            }
        }
        Ok(())
    }

    /// Planned state plus the resolved tables and lists
    fn applied_state(
        planned: DynamicValue,
        name: &str,
        object: &TrafficManager,
    ) -> Result<DynamicValue, StateError> {
        let mut state = planned;
        write_string(&mut state, "id", Some(name))?;
        Self::write_tables(&mut state, object)?;

        let mut object = object.clone();
        for field in fields(&mut object) {
            if let Field::List(attr, value, _) = field {
                write_string_list(&mut state, attr, value.as_deref())?;
            }
        }
        Ok(state)
    }

    /// GET, overlay, PUT; shared by create and update
    async fn apply(
        &self,
        ctx: &Context,
        planned: &DynamicValue,
    ) -> Result<(String, TrafficManager), Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let name = read_string(planned, "name").unwrap_or_default();
        let failed = || format!("Failed to update {} '{}'", TYPE_NAME, name);

        let api = provider_data.client.config::<TrafficManager>();
        let mut object = remote(ctx, api.get(&name))
            .await
            .map_err(|e| api_diagnostic(failed(), &e))?;
        Self::apply_config(&mut object, planned).map_err(|e| shadow_diagnostic(&e))?;
        remote(ctx, api.put(&name, &object))
            .await
            .map_err(|e| api_diagnostic(failed(), &e))?;

        tracing::debug!("applied {} '{}'", TYPE_NAME, name);
        Ok((name, object))
    }
}

fn string_attr(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .optional()
        .build()
}

fn string_default(name: &str, description: &str, default: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .default(StaticDefault::string(default))
        .build()
}

fn enum_default(name: &str, description: &str, allowed: &[&str], default: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .validator(StringOneOf::create(allowed))
        .default(StaticDefault::string(default))
        .build()
}

fn bool_default(name: &str, description: &str, default: bool) -> Attribute {
    AttributeBuilder::bool(name)
        .description(description)
        .default(StaticDefault::bool(default))
        .build()
}

fn int_default(
    name: &str,
    description: &str,
    validator: Arc<dyn Validator>,
    default: i64,
) -> Attribute {
    AttributeBuilder::number(name)
        .description(description)
        .validator(validator)
        .default(StaticDefault::number(default as f64))
        .build()
}

fn required_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .required()
        .build()
}

fn required_list(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string_list(name)
        .description(description)
        .required()
        .build()
}

#[async_trait]
impl Resource for TrafficManagerResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let card_rows = vec![
            required_list("interfaces", "Names of the interfaces on the card"),
            string_default("label", "Label of the network card", "-"),
            required_string("name", "PCI address of the card"),
        ];
        let sysctl_rows = vec![
            string_attr("description", "What the setting is for"),
            required_string("sysctl", "Name of the kernel parameter"),
            required_string("value", "Value of the kernel parameter"),
        ];
        let trafficip_rows = vec![
            required_string("name", "Network interface"),
            required_list("networks", "Networks reachable through the interface"),
        ];
        let host_rows = vec![
            required_string("ip_address", "IP address of the host"),
            required_string("name", "Name of the host"),
        ];
        let interface_rows = vec![
            bool_default("autoneg", "Auto-negotiate speed and duplex", true),
            enum_default(
                "bmode",
                "Bonding mode",
                &["802_3ad", "balance_alb"],
                "802_3ad",
            ),
            string_attr("bond", "Bonded interface this interface belongs to"),
            bool_default("duplex", "Full duplex", true),
            enum_default("mode", "Addressing mode", &["dhcp", "static"], "static"),
            int_default("mtu", "Maximum transmission unit", IntBetween::create(68, 9216), 1500),
            required_string("name", "Interface name"),
            enum_default(
                "speed",
                "Link speed in Mb/s",
                &["10", "100", "1000", "10000", "100000", "40000"],
                "1000",
            ),
        ];
        let address_rows = vec![
            required_string("addr", "IP address"),
            bool_default("isexternal", "Address is on the external network", false),
            required_string("mask", "Netmask"),
            required_string("name", "Interface name"),
        ];
        let route_rows = vec![
            required_string("gw", "Gateway address"),
            required_string("if", "Interface to route through"),
            required_string("mask", "Netmask"),
            required_string("name", "Destination network"),
        ];

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages the configuration of a traffic manager cluster member")
            .attribute(id_attribute())
            .attribute(name_attribute("Name of the traffic manager"))
            .attribute(string_default(
                "adminmasterxmlip",
                "Admin server IP for master mode",
                "0.0.0.0",
            ))
            .attribute(string_default(
                "adminslavexmlip",
                "Admin server IP for slave mode",
                "0.0.0.0",
            ))
            .attribute(table_attribute(
                APPLIANCE_CARD.name,
                "Network cards of the appliance",
                card_rows,
            ))
            .attribute(json_attribute(APPLIANCE_CARD.json_name))
            .attribute(table_attribute(
                APPLIANCE_SYSCTL.name,
                "Custom kernel parameters",
                sysctl_rows,
            ))
            .attribute(json_attribute(APPLIANCE_SYSCTL.json_name))
            .attribute(string_default(
                "authenticationserverip",
                "Authentication server IP",
                "0.0.0.0",
            ))
            .attribute(string_attr("cloud_platform", "Cloud platform the traffic manager runs on"))
            .attribute(string_attr("location", "Location of the traffic manager"))
            .attribute(string_attr("nameip", "Address other cluster members use"))
            .attribute(int_default(
                "num_aptimizer_threads",
                "Web acceleration threads, 0 for automatic",
                IntAtLeast::create(0),
                0,
            ))
            .attribute(int_default(
                "num_children",
                "Child processes, 0 for automatic",
                IntAtLeast::create(0),
                0,
            ))
            .attribute(int_default(
                "numberofcpus",
                "CPUs the traffic manager may use",
                IntBetween::create(1, 64),
                1,
            ))
            .attribute(int_default(
                "restserverport",
                "Internal REST server port",
                IntAtLeast::create(0),
                0,
            ))
            .attribute(table_attribute(
                TRAFFICIP.name,
                "Networks each interface can reach for traffic IPs",
                trafficip_rows,
            ))
            .attribute(json_attribute(TRAFFICIP.json_name))
            .attribute(string_default("updaterip", "Updater IP", "0.0.0.0"))
            .attribute(bool_default(
                "appliance_disable_kpti",
                "Disable kernel page table isolation",
                false,
            ))
            .attribute(string_attr("appliance_gateway_ipv4", "Default IPv4 gateway"))
            .attribute(string_attr("appliance_gateway_ipv6", "Default IPv6 gateway"))
            .attribute(string_attr("appliance_hostname", "Appliance host name"))
            .attribute(table_attribute(
                APPLIANCE_HOSTS.name,
                "Static host name entries",
                host_rows,
            ))
            .attribute(json_attribute(APPLIANCE_HOSTS.json_name))
            .attribute(table_attribute(
                APPLIANCE_IF.name,
                "Network interface settings",
                interface_rows,
            ))
            .attribute(json_attribute(APPLIANCE_IF.json_name))
            .attribute(table_attribute(
                APPLIANCE_IP.name,
                "Interface addresses",
                address_rows,
            ))
            .attribute(json_attribute(APPLIANCE_IP.json_name))
            .attribute(bool_default(
                "appliance_ipmi_lan_access",
                "Allow IPMI LAN access",
                false,
            ))
            .attribute(string_attr("appliance_ipmi_lan_addr", "IPMI LAN address"))
            .attribute(string_attr("appliance_ipmi_lan_gateway", "IPMI LAN gateway"))
            .attribute(enum_default(
                "appliance_ipmi_lan_ipsrc",
                "IPMI LAN addressing mode",
                &["dhcp", "static"],
                "static",
            ))
            .attribute(string_attr("appliance_ipmi_lan_mask", "IPMI LAN netmask"))
            .attribute(bool_default(
                "appliance_ipv4_forwarding",
                "Forward IPv4 packets",
                false,
            ))
            .attribute(bool_default(
                "appliance_ipv6_forwarding",
                "Forward IPv6 packets",
                false,
            ))
            .attribute(bool_default(
                "appliance_licence_agreed",
                "The licence agreement has been accepted",
                false,
            ))
            .attribute(bool_default(
                "appliance_manageazureroutes",
                "Manage Azure routes",
                true,
            ))
            .attribute(bool_default(
                "appliance_managedpa",
                "Manage the data plane acceleration",
                true,
            ))
            .attribute(bool_default(
                "appliance_manageec2conf",
                "Manage EC2 configuration",
                true,
            ))
            .attribute(bool_default(
                "appliance_manageiptrans",
                "Manage IP transparency",
                true,
            ))
            .attribute(bool_default(
                "appliance_managereservedports",
                "Manage reserved ports",
                true,
            ))
            .attribute(bool_default(
                "appliance_managereturnpath",
                "Manage return path routing",
                true,
            ))
            .attribute(bool_default(
                "appliance_manageservices",
                "Manage system services",
                true,
            ))
            .attribute(bool_default(
                "appliance_managevpcconf",
                "Manage VPC configuration",
                true,
            ))
            .attribute(list_attribute("appliance_name_servers", "DNS name servers"))
            .attribute(list_attribute("appliance_ntpservers", "NTP servers"))
            .attribute(table_attribute(
                APPLIANCE_ROUTES.name,
                "Static routes",
                route_rows,
            ))
            .attribute(json_attribute(APPLIANCE_ROUTES.json_name))
            .attribute(list_attribute("appliance_search_domains", "DNS search domains"))
            .attribute(bool_default("appliance_ssh_enabled", "Run the SSH server", true))
            .attribute(bool_default(
                "appliance_ssh_password_allowed",
                "Allow SSH password logins",
                true,
            ))
            .attribute(int_default(
                "appliance_ssh_port",
                "SSH server port",
                IntBetween::create(1, 65535),
                22,
            ))
            .attribute(string_default("appliance_timezone", "Time zone", "US/Pacific"))
            .attribute(list_attribute("appliance_vlans", "VLANs to create"))
            .attribute(bool_default(
                "cluster_comms_allow_update",
                "Accept configuration updates from the cluster",
                true,
            ))
            .attribute(string_default(
                "cluster_comms_bind_ip",
                "Address for cluster communication",
                "*",
            ))
            .attribute(string_attr(
                "cluster_comms_external_ip",
                "External address for cluster communication",
            ))
            .attribute(int_default(
                "cluster_comms_port",
                "Cluster communication port",
                IntBetween::create(1, 65535),
                9080,
            ))
            .attribute(list_attribute(
                "ec2_trafficips_public_enis",
                "ENIs that may hold public traffic IPs",
            ))
            .attribute(string_attr("fault_tolerance_bgp_router_id", "BGP router id"))
            .attribute(list_attribute(
                "fault_tolerance_lss_dedicated_ips",
                "Dedicated addresses for layer 4 stateless persistence",
            ))
            .attribute(string_attr("fault_tolerance_ospfv2_ip", "OSPFv2 source address"))
            .attribute(list_attribute(
                "fault_tolerance_ospfv2_neighbor_addrs",
                "OSPFv2 neighbour addresses",
            ))
            .attribute(bool_default(
                "iptables_config_enabled",
                "Manage iptables configuration",
                true,
            ))
            .attribute(int_default(
                "iptrans_fwmark",
                "Firewall mark for IP transparency",
                IntAtLeast::create(0),
                320,
            ))
            .attribute(bool_default(
                "iptrans_iptables_enabled",
                "Manage iptables for IP transparency",
                true,
            ))
            .attribute(int_default(
                "iptrans_routing_table",
                "Routing table for IP transparency",
                IntBetween::create(256, 2147483647),
                320,
            ))
            .attribute(int_default(
                "java_port",
                "Java extension port",
                IntBetween::create(1024, 65535),
                9060,
            ))
            .attribute(string_attr(
                "remote_licensing_email_address",
                "Contact address for remote licensing",
            ))
            .attribute(string_attr(
                "remote_licensing_message",
                "Message sent with remote licensing requests",
            ))
            .attribute(list_attribute("rest_api_bind_ips", "Addresses the REST API listens on"))
            .attribute(int_default(
                "rest_api_port",
                "REST API port",
                IntBetween::create(1, 65535),
                9070,
            ))
            .attribute(list_attribute("snmp_allow", "Hosts allowed to query SNMP"))
            .attribute(
                AttributeBuilder::string("snmp_auth_password")
                    .description("SNMPv3 authentication password")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(string_default("snmp_bind_ip", "Address the SNMP server listens on", "*"))
            .attribute(string_default("snmp_community", "SNMP community", "public"))
            .attribute(bool_default("snmp_enabled", "Run the SNMP server", false))
            .attribute(enum_default(
                "snmp_hash_algorithm",
                "SNMPv3 hash algorithm",
                &["md5", "sha1"],
                "md5",
            ))
            .attribute(string_default("snmp_port", "SNMP server port", "default"))
            .attribute(
                AttributeBuilder::string("snmp_priv_password")
                    .description("SNMPv3 privacy password")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(enum_default(
                "snmp_security_level",
                "SNMPv3 security level",
                &["authnopriv", "authpriv", "noauthnopriv"],
                "noauthnopriv",
            ))
            .attribute(string_attr("snmp_username", "SNMPv3 user"))
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let config = &request.config;
        let results = [
            resolve_table::<ApplianceCard>(config, APPLIANCE_CARD).err(),
            resolve_table::<ApplianceSysctl>(config, APPLIANCE_SYSCTL).err(),
            resolve_table::<Trafficip>(config, TRAFFICIP).err(),
            resolve_table::<Host>(config, APPLIANCE_HOSTS).err(),
            resolve_table::<Interface>(config, APPLIANCE_IF).err(),
            resolve_table::<Address>(config, APPLIANCE_IP).err(),
            resolve_table::<Route>(config, APPLIANCE_ROUTES).err(),
        ];
        ValidateResourceConfigResponse {
            diagnostics: results.iter().flatten().map(shadow_diagnostic).collect(),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let (name, object) = match self.apply(&ctx, &request.planned_state).await {
            Ok(applied) => applied,
            Err(diag) => {
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![diag],
                }
            }
        };

        match Self::applied_state(request.planned_state.clone(), &name, &object) {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![state_diagnostic(&e)],
            },
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let name = match read_string(&request.current_state, "name") {
            Some(name) => name,
            None => {
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
        };

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let client = &provider_data.client;
        match remote(&ctx, client.config::<TrafficManager>().get(&name)).await {
            Ok(object) => {
                let mut new_state = request.current_state.clone();
                match Self::write_state(&mut new_state, &name, &object) {
                    Ok(()) => ReadResourceResponse {
                        new_state: Some(new_state),
                        diagnostics,
                    },
                    Err(e) => {
                        diagnostics.push(state_diagnostic(&e));
                        ReadResourceResponse {
                            new_state: Some(request.current_state),
                            diagnostics,
                        }
                    }
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} '{}' no longer exists", TYPE_NAME, name);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(api_diagnostic(
                    format!("Failed to read {} '{}'", TYPE_NAME, name),
                    &e,
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                }
            }
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let (name, object) = match self.apply(&ctx, &request.planned_state).await {
            Ok(applied) => applied,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics: vec![diag],
                }
            }
        };

        match Self::applied_state(request.planned_state, &name, &object) {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![state_diagnostic(&e)],
            },
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        if let Some(name) = read_string(&request.prior_state, "name") {
            tracing::debug!(
                "forgetting {} '{}'; cluster members are not removed remotely",
                TYPE_NAME,
                name
            );
        }
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for TrafficManagerResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        match VtmProviderData::from_any(request.provider_data) {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for TrafficManagerResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("name"), &request, &mut response);
        response
    }
}
