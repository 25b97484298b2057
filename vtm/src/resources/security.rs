//! Security settings resource implementation
//!
//! The security settings are a singleton that always exists on the appliance,
//! so the resource has no name. Its id is always `security`.

use super::{api_diagnostic, id_attribute, list_attribute, remote, state_diagnostic, StateError};
use crate::api::Security;
use crate::attributes::{
    assign_bool, assign_i64, write_bool, write_i64, write_string, write_string_list,
};
use crate::provider_data::{not_configured, VtmProviderData};
use crate::shadow::resolve_string_list;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse, ImportedResource,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};
use tfplug::validator::IntBetween;

const TYPE_NAME: &str = "vtm_security";
const SINGLETON_ID: &str = "security";

#[derive(Default)]
pub struct SecurityResource {
    provider_data: Option<VtmProviderData>,
}

impl SecurityResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_config(object: &mut Security, config: &DynamicValue) {
        object.basic.access = Some(resolve_string_list(config, "access", &[]));

        let ssh = &mut object.ssh_intrusion;
        assign_i64(&mut ssh.bantime, config, "ssh_intrusion_bantime");
        ssh.blacklist = Some(resolve_string_list(config, "ssh_intrusion_blacklist", &[]));
        assign_bool(&mut ssh.enabled, config, "ssh_intrusion_enabled");
        assign_i64(&mut ssh.findtime, config, "ssh_intrusion_findtime");
        assign_i64(&mut ssh.maxretry, config, "ssh_intrusion_maxretry");
        ssh.whitelist = Some(resolve_string_list(config, "ssh_intrusion_whitelist", &[]));
    }

    fn write_lists(state: &mut DynamicValue, object: &Security) -> Result<(), StateError> {
        let ssh = &object.ssh_intrusion;
        write_string_list(state, "access", object.basic.access.as_deref())?;
        write_string_list(state, "ssh_intrusion_blacklist", ssh.blacklist.as_deref())?;
        write_string_list(state, "ssh_intrusion_whitelist", ssh.whitelist.as_deref())?;
        Ok(())
    }

    fn write_state(state: &mut DynamicValue, object: &Security) -> Result<(), StateError> {
        write_string(state, "id", Some(SINGLETON_ID))?;

        let ssh = &object.ssh_intrusion;
        write_i64(state, "ssh_intrusion_bantime", ssh.bantime)?;
        write_bool(state, "ssh_intrusion_enabled", ssh.enabled)?;
        write_i64(state, "ssh_intrusion_findtime", ssh.findtime)?;
        write_i64(state, "ssh_intrusion_maxretry", ssh.maxretry)?;
        Self::write_lists(state, object)
    }

    /// GET, overlay, PUT; create and update are the same operation
    async fn apply(&self, ctx: &Context, planned: DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let failed = || format!("Failed to update {}", TYPE_NAME);

        let api = provider_data.client.config::<Security>();
        let mut object = remote(ctx, api.get(SINGLETON_ID))
            .await
            .map_err(|e| api_diagnostic(failed(), &e))?;
        Self::apply_config(&mut object, &planned);
        remote(ctx, api.put(SINGLETON_ID, &object))
            .await
            .map_err(|e| api_diagnostic(failed(), &e))?;
        tracing::debug!("applied {}", TYPE_NAME);

        let mut state = planned;
        write_string(&mut state, "id", Some(SINGLETON_ID))
            .map_err(|e| state_diagnostic(&StateError::from(e)))?;
        Self::write_lists(&mut state, &object).map_err(|e| state_diagnostic(&e))?;
        Ok(state)
    }
}

fn interval(name: &str, description: &str, default: i64) -> tfplug::schema::Attribute {
    AttributeBuilder::number(name)
        .description(description)
        .validator(IntBetween::create(1, 2147483647))
        .default(StaticDefault::number(default as f64))
        .build()
}

#[async_trait]
impl Resource for SecurityResource {
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
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages the global security settings of the cluster")
            .attribute(id_attribute())
            .attribute(list_attribute(
                "access",
                "Addresses, subnets or DNS wildcards allowed to reach the admin server",
            ))
            .attribute(interval(
                "ssh_intrusion_bantime",
                "Seconds an offending host stays banned",
                600,
            ))
            .attribute(list_attribute(
                "ssh_intrusion_blacklist",
                "Hosts that are always banned",
            ))
            .attribute(
                AttributeBuilder::bool("ssh_intrusion_enabled")
                    .description("Ban hosts that repeatedly fail SSH logins")
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(interval(
                "ssh_intrusion_findtime",
                "Window in seconds in which failures are counted",
                600,
            ))
            .attribute(interval(
                "ssh_intrusion_maxretry",
                "Failures within the window before a host is banned",
                6,
            ))
            .attribute(list_attribute(
                "ssh_intrusion_whitelist",
                "Hosts that are never banned",
            ))
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.apply(&ctx, request.planned_state.clone()).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![diag],
            },
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

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
        match remote(&ctx, client.config::<Security>().get(SINGLETON_ID)).await {
            Ok(object) => {
                let mut new_state = request.current_state.clone();
                match Self::write_state(&mut new_state, &object) {
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
                tracing::warn!("{} is missing on the traffic manager", TYPE_NAME);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(api_diagnostic(format!("Failed to read {}", TYPE_NAME), &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                }
            }
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.apply(&ctx, request.planned_state).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![diag],
            },
        }
    }

    async fn delete(&self, _ctx: Context, _request: DeleteResourceRequest) -> DeleteResourceResponse {
        tracing::debug!("forgetting {}; the settings stay on the appliance", TYPE_NAME);
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for SecurityResource {
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
impl ResourceWithImportState for SecurityResource {
    /// Any import id selects the singleton
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        if request.id != SINGLETON_ID {
            tracing::debug!(
                "import id '{}' ignored for {}; using '{}'",
                request.id,
                TYPE_NAME,
                SINGLETON_ID
            );
        }

        let mut state = DynamicValue::empty_object();
        match write_string(&mut state, "id", Some(SINGLETON_ID)) {
            Ok(()) => response.imported_resources.push(ImportedResource {
                type_name: request.type_name,
                state,
            }),
            Err(e) => response
                .diagnostics
                .push(Diagnostic::error("Failed to import security settings", e.to_string())),
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfplug::schema::Schema;
    use tfplug::types::{AttributePath, ClientCapabilities};

    async fn schema() -> Schema {
        SecurityResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema
    }

    #[tokio::test]
    async fn unset_lists_are_cleared_and_scalars_defaulted() {
        let planned = schema().await.apply_defaults(&DynamicValue::empty_object());
        let mut object = Security::default();
        object.basic.access = Some(vec!["10.0.0.0/8".into()]);
        object.ssh_intrusion.whitelist = Some(vec!["10.1.1.1".into()]);

        SecurityResource::apply_config(&mut object, &planned);

        assert_eq!(object.basic.access, Some(vec![]));
        assert_eq!(object.ssh_intrusion.whitelist, Some(vec![]));
        assert_eq!(object.ssh_intrusion.bantime, Some(600));
        assert_eq!(object.ssh_intrusion.findtime, Some(600));
        assert_eq!(object.ssh_intrusion.maxretry, Some(6));
        assert_eq!(object.ssh_intrusion.enabled, Some(false));
    }

    #[tokio::test]
    async fn zero_maxretry_is_rejected() {
        let mut config = DynamicValue::empty_object();
        config
            .set_number(&AttributePath::new("ssh_intrusion_maxretry"), 0.0)
            .unwrap();
        let diags = schema().await.validate(&config);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].attribute,
            Some(AttributePath::new("ssh_intrusion_maxretry"))
        );
    }

    #[test]
    fn read_state_uses_fixed_id() {
        let mut object = Security::default();
        object.ssh_intrusion.maxretry = Some(3);

        let mut state = DynamicValue::empty_object();
        SecurityResource::write_state(&mut state, &object).unwrap();

        assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "security");
        assert_eq!(
            state
                .get_i64(&AttributePath::new("ssh_intrusion_maxretry"))
                .unwrap(),
            3
        );
        assert!(state
            .get_string_list(&AttributePath::new("access"))
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn import_ignores_the_given_id() {
        let response = SecurityResource::new()
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: "anything".to_string(),
                    client_capabilities: ClientCapabilities::default(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            "security"
        );
    }
}
