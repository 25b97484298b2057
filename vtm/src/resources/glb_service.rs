//! GLB service resource implementation

use super::{
    api_diagnostic, id_attribute, json_attribute, list_attribute, name_attribute, remote,
    shadow_diagnostic, state_diagnostic, table_attribute, StateError,
};
use crate::api::glb_service::{DnssecKey, LocationSetting};
use crate::api::GlbService;
use crate::attributes::{
    assign_bool, assign_i64, assign_string, read_string, write_bool, write_i64, write_string,
    write_string_list,
};
use crate::provider_data::{not_configured, VtmProviderData};
use crate::shadow::{resolve_string_list, resolve_table, write_table, ShadowError, TableAttribute};
use async_trait::async_trait;
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
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{AttributePath, DynamicValue};
use tfplug::validator::{IntAtLeast, IntBetween, StringOneOf};

const TYPE_NAME: &str = "vtm_glb_service";

const DNSSEC_KEYS: TableAttribute = TableAttribute::new("dnssec_keys", "dnssec_keys_json");
const LOCATION_SETTINGS: TableAttribute =
    TableAttribute::new("location_settings", "location_settings_json");

#[derive(Default)]
pub struct GlbServiceResource {
    provider_data: Option<VtmProviderData>,
}

impl GlbServiceResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `object` with the planned values
    fn apply_config(
        object: &mut GlbService,
        config: &DynamicValue,
    ) -> Result<(), ShadowError> {
        let basic = &mut object.basic;
        assign_string(&mut basic.algorithm, config, "algorithm");
        assign_bool(&mut basic.all_monitors_needed, config, "all_monitors_needed");
        assign_bool(&mut basic.autorecovery, config, "autorecovery");
        assign_bool(&mut basic.chained_auto_failback, config, "chained_auto_failback");
        basic.chained_location_order =
            Some(resolve_string_list(config, "chained_location_order", &[]));
        assign_bool(&mut basic.disable_on_failure, config, "disable_on_failure");
        basic.dnssec_keys = Some(resolve_table(config, DNSSEC_KEYS)?);
        basic.domains = Some(resolve_string_list(config, "domains", &[]));
        assign_bool(&mut basic.enabled, config, "enabled");
        assign_i64(&mut basic.geo_effect, config, "geo_effect");
        basic.last_resort_response =
            Some(resolve_string_list(config, "last_resort_response", &[]));
        basic.location_draining = Some(resolve_string_list(config, "location_draining", &[]));
        basic.location_settings = Some(resolve_table(config, LOCATION_SETTINGS)?);
        assign_bool(&mut basic.return_ips_on_fail, config, "return_ips_on_fail");
        basic.rules = Some(resolve_string_list(config, "rules", &[]));
        assign_i64(&mut basic.ttl, config, "ttl");

        let log = &mut object.log;
        assign_bool(&mut log.enabled, config, "log_enabled");
        assign_string(&mut log.filename, config, "log_filename");
        assign_string(&mut log.format, config, "log_format");
        Ok(())
    }

    /// Copy the resolved lists and tables back so both table views agree
    fn write_resolved(state: &mut DynamicValue, object: &GlbService) -> Result<(), StateError> {
        let basic = &object.basic;
        write_string_list(
            state,
            "chained_location_order",
            basic.chained_location_order.as_deref(),
        )?;
        write_string_list(state, "domains", basic.domains.as_deref())?;
        write_string_list(
            state,
            "last_resort_response",
            basic.last_resort_response.as_deref(),
        )?;
        write_string_list(state, "location_draining", basic.location_draining.as_deref())?;
        write_string_list(state, "rules", basic.rules.as_deref())?;
        write_table(
            state,
            DNSSEC_KEYS,
            basic.dnssec_keys.as_deref().unwrap_or_default(),
        )?;
        write_table(
            state,
            LOCATION_SETTINGS,
            basic.location_settings.as_deref().unwrap_or_default(),
        )?;
        Ok(())
    }

    fn write_state(
        state: &mut DynamicValue,
        name: &str,
        object: &GlbService,
    ) -> Result<(), StateError> {
        write_string(state, "id", Some(name))?;
        write_string(state, "name", Some(name))?;

        let basic = &object.basic;
        write_string(state, "algorithm", basic.algorithm.as_deref())?;
        write_bool(state, "all_monitors_needed", basic.all_monitors_needed)?;
        write_bool(state, "autorecovery", basic.autorecovery)?;
        write_bool(state, "chained_auto_failback", basic.chained_auto_failback)?;
        write_bool(state, "disable_on_failure", basic.disable_on_failure)?;
        write_bool(state, "enabled", basic.enabled)?;
        write_i64(state, "geo_effect", basic.geo_effect)?;
        write_bool(state, "return_ips_on_fail", basic.return_ips_on_fail)?;
        write_i64(state, "ttl", basic.ttl)?;

        let log = &object.log;
        write_bool(state, "log_enabled", log.enabled)?;
        write_string(state, "log_filename", log.filename.as_deref())?;
        write_string(state, "log_format", log.format.as_deref())?;

        Self::write_resolved(state, object)
    }

    /// Final state after a successful PUT
    fn applied_state(
        planned: DynamicValue,
        name: &str,
        object: &GlbService,
    ) -> Result<DynamicValue, StateError> {
        let mut state = planned;
        write_string(&mut state, "id", Some(name))?;
        Self::write_resolved(&mut state, object)?;
        Ok(state)
    }
}

#[async_trait]
impl Resource for GlbServiceResource {
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
        let dnssec_rows = vec![
            AttributeBuilder::string("domain")
                .description("A domain authenticated by the associated private keys")
                .required()
                .build(),
            AttributeBuilder::string_list("ssl_key")
                .description("Private keys that authenticate the domain")
                .required()
                .build(),
        ];
        let location_rows = vec![
            AttributeBuilder::string_list("ips")
                .description("IP addresses in the location")
                .required()
                .build(),
            AttributeBuilder::string("location")
                .description("Location to which the settings apply")
                .required()
                .build(),
            AttributeBuilder::string_list("monitors")
                .description("Monitors used to check the health of the location")
                .optional()
                .build(),
            AttributeBuilder::number("weight")
                .description("Weight for this location, for the weighted random algorithm")
                .validator(IntBetween::create(1, 100))
                .default(StaticDefault::number(1.0))
                .build(),
        ];

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a global load balancing service")
            .attribute(id_attribute())
            .attribute(name_attribute("Name of the GLB service"))
            .attribute(
                AttributeBuilder::string("algorithm")
                    .description("Load balancing algorithm between locations")
                    .validator(StringOneOf::create(&[
                        "chained",
                        "geo",
                        "hybrid",
                        "load",
                        "round_robin",
                        "weighted_random",
                    ]))
                    .default(StaticDefault::string("hybrid"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("all_monitors_needed")
                    .description("All monitors must report a location healthy")
                    .default(StaticDefault::bool(true))
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("autorecovery")
                    .description("Return failed locations to service when they recover")
                    .default(StaticDefault::bool(true))
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("chained_auto_failback")
                    .description("Fail back to the preferred location when it recovers")
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(list_attribute(
                "chained_location_order",
                "Locations in order of preference for the chained algorithm",
            ))
            .attribute(
                AttributeBuilder::bool("disable_on_failure")
                    .description("Keep failed locations disabled until manually re-enabled")
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(table_attribute(
                DNSSEC_KEYS.name,
                "DNSSEC keys per domain",
                dnssec_rows,
            ))
            .attribute(json_attribute(DNSSEC_KEYS.json_name))
            .attribute(list_attribute("domains", "Domains handled by this service"))
            .attribute(
                AttributeBuilder::bool("enabled")
                    .description("Enable the service")
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("geo_effect")
                    .description("Percentage weight of geographic distance for the hybrid algorithm")
                    .validator(IntBetween::create(0, 100))
                    .default(StaticDefault::number(50.0))
                    .build(),
            )
            .attribute(list_attribute(
                "last_resort_response",
                "Response when all locations are unavailable",
            ))
            .attribute(list_attribute(
                "location_draining",
                "Locations being drained",
            ))
            .attribute(table_attribute(
                LOCATION_SETTINGS.name,
                "Per-location settings",
                location_rows,
            ))
            .attribute(json_attribute(LOCATION_SETTINGS.json_name))
            .attribute(
                AttributeBuilder::bool("return_ips_on_fail")
                    .description("Return all IPs when every location has failed")
                    .default(StaticDefault::bool(true))
                    .build(),
            )
            .attribute(list_attribute("rules", "Response rules applied to the service"))
            .attribute(
                AttributeBuilder::number("ttl")
                    .description("TTL for DNS responses, -1 keeps the backend TTL")
                    .validator(IntAtLeast::create(-1))
                    .default(StaticDefault::number(-1.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("log_enabled")
                    .description("Log connections to this service")
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("log_filename")
                    .description("Log file name")
                    .default(StaticDefault::string("%zeushome%/zxtm/log/services/%g.log"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("log_format")
                    .description("Log line format")
                    .default(StaticDefault::string("%t, %s, %l, %q, %g, %n, %d, %a"))
                    .build(),
            )
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
        let mut diagnostics = vec![];
        if let Err(e) = resolve_table::<DnssecKey>(&request.config, DNSSEC_KEYS) {
            diagnostics.push(shadow_diagnostic(&e));
        }
        if let Err(e) = resolve_table::<LocationSetting>(&request.config, LOCATION_SETTINGS) {
            diagnostics.push(shadow_diagnostic(&e));
        }
        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let name = read_string(&request.planned_state, "name").unwrap_or_default();
        let mut object = GlbService::default();
        if let Err(e) = Self::apply_config(&mut object, &request.planned_state) {
            diagnostics.push(shadow_diagnostic(&e));
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }

        let client = &provider_data.client;
        if let Err(e) = remote(&ctx, client.config::<GlbService>().put(&name, &object)).await {
            diagnostics.push(api_diagnostic(
                format!("Failed to create {} '{}'", TYPE_NAME, name),
                &e,
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }

        tracing::debug!("created {} '{}'", TYPE_NAME, name);
        match Self::applied_state(request.planned_state.clone(), &name, &object) {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(state_diagnostic(&e));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                }
            }
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
        match remote(&ctx, client.config::<GlbService>().get(&name)).await {
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
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };

        let name = read_string(&request.planned_state, "name").unwrap_or_default();
        let api = provider_data.client.config::<GlbService>();
        let mut object = match remote(&ctx, api.get(&name)).await {
            Ok(object) => object,
            Err(e) => {
                diagnostics.push(api_diagnostic(
                    format!("Failed to update {} '{}'", TYPE_NAME, name),
                    &e,
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };

        if let Err(e) = Self::apply_config(&mut object, &request.planned_state) {
            diagnostics.push(shadow_diagnostic(&e));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        }

        if let Err(e) = remote(&ctx, api.put(&name, &object)).await {
            diagnostics.push(api_diagnostic(
                format!("Failed to update {} '{}'", TYPE_NAME, name),
                &e,
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        }

        match Self::applied_state(request.planned_state, &name, &object) {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(state_diagnostic(&e));
                UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                }
            }
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return DeleteResourceResponse { diagnostics };
            }
        };

        let name = match read_string(&request.prior_state, "name") {
            Some(name) => name,
            None => return DeleteResourceResponse { diagnostics },
        };

        let client = &provider_data.client;
        match remote(&ctx, client.config::<GlbService>().delete(&name)).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} '{}' was already deleted", TYPE_NAME, name);
            }
            Err(e) => diagnostics.push(api_diagnostic(
                format!("Failed to delete {} '{}'", TYPE_NAME, name),
                &e,
            )),
        }
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for GlbServiceResource {
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
impl ResourceWithImportState for GlbServiceResource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tfplug::schema::Schema;
    use tfplug::types::Dynamic;

    async fn schema() -> Schema {
        GlbServiceResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema
    }

    #[tokio::test]
    async fn defaults_fill_unset_attributes() {
        let schema = schema().await;
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "glb-eu".into())
            .unwrap();
        let planned = schema.apply_defaults(&config);

        let mut object = GlbService::default();
        GlbServiceResource::apply_config(&mut object, &planned).unwrap();
        assert_eq!(object.basic.algorithm.as_deref(), Some("hybrid"));
        assert_eq!(object.basic.geo_effect, Some(50));
        assert_eq!(object.basic.ttl, Some(-1));
        assert_eq!(object.basic.domains, Some(vec![]));
        assert_eq!(object.basic.dnssec_keys, Some(vec![]));
        assert_eq!(
            object.log.format.as_deref(),
            Some("%t, %s, %l, %q, %g, %n, %d, %a")
        );
    }

    #[tokio::test]
    async fn geo_effect_out_of_range_is_rejected() {
        let schema = schema().await;
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "glb-eu".into())
            .unwrap();
        config
            .set_number(&AttributePath::new("geo_effect"), 101.0)
            .unwrap();
        let diags = schema.validate(&config);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute, Some(AttributePath::new("geo_effect")));
    }

    #[tokio::test]
    async fn mis_shaped_json_is_reported_at_validate_time() {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(
                &AttributePath::new("location_settings_json"),
                r#"[{"location": 7}]"#.into(),
            )
            .unwrap();
        let response = GlbServiceResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: TYPE_NAME.to_string(),
                    config,
                    client_capabilities: Default::default(),
                },
            )
            .await;
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].attribute,
            Some(AttributePath::new("location_settings_json"))
        );
    }

    #[test]
    fn read_state_mirrors_remote_object() {
        let mut object = GlbService::default();
        object.basic.algorithm = Some("geo".into());
        object.basic.location_settings = Some(vec![LocationSetting {
            ips: Some(vec!["10.0.0.1".into()]),
            location: Some("london".into()),
            monitors: None,
            weight: Some(3),
        }]);

        let mut state = DynamicValue::empty_object();
        GlbServiceResource::write_state(&mut state, "glb-eu", &object).unwrap();

        assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "glb-eu");
        assert_eq!(
            state.get_string(&AttributePath::new("algorithm")).unwrap(),
            "geo"
        );
        assert_eq!(
            state.get(&AttributePath::new("ttl")),
            Some(&Dynamic::Null)
        );
        let rows = state
            .get_list(&AttributePath::new("location_settings"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        let json = state
            .get_string(&AttributePath::new("location_settings_json"))
            .unwrap();
        assert!(json.contains("\"london\""));
        assert_eq!(
            state.get_string(&AttributePath::new("dnssec_keys_json")).unwrap(),
            "[]"
        );
    }
}
