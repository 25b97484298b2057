//! Import helpers for simplifying resource import implementations

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// Sets the import ID to a specific attribute in state
///
/// Example: ID "glb-eu" -> state.name = "glb-eu"
pub fn import_state_passthrough_id(
    _ctx: &Context,
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let mut state = DynamicValue::empty_object();

    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!(
                    "Could not set attribute '{}' to value '{}'",
                    attr_path, request.id
                ),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientCapabilities;

    #[test]
    fn passthrough_copies_id_into_attribute() {
        let request = ImportResourceStateRequest {
            type_name: "vtm_glb_service".to_string(),
            id: "glb-eu".to_string(),
            client_capabilities: ClientCapabilities::default(),
        };
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        import_state_passthrough_id(
            &Context::new(),
            AttributePath::new("name"),
            &request,
            &mut response,
        );

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        let imported = &response.imported_resources[0];
        assert_eq!(imported.type_name, "vtm_glb_service");
        assert_eq!(
            imported.state.get_string(&AttributePath::new("name")).unwrap(),
            "glb-eu"
        );
    }
}
