use serde_json::{json, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::authz;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(routes::health::health, routes::access::check_access),
    components(
        schemas(
            routes::Page,
            routes::health::HealthResponse,
            routes::access::AccessCheckResponse,
            authz::UserContext,
            authz::Role,
            authz::PermissionKind
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Access", description = "Access gate diagnostics")
    )
)]
pub struct ApiDoc;

pub fn build_openapi() -> anyhow::Result<utoipa::openapi::OpenApi> {
    let mut doc = serde_json::to_value(ApiDoc::openapi())?;
    ensure_security_components(&mut doc);
    Ok(serde_json::from_value(doc)?)
}

/// Swagger UI at `/docs`, document at `/api-docs/openapi.json`
pub fn swagger() -> anyhow::Result<SwaggerUi> {
    Ok(SwaggerUi::new("/docs").url("/api-docs/openapi.json", build_openapi()?))
}

fn ensure_security_components(doc: &mut Value) {
    let Some(root) = doc.as_object_mut() else {
        return;
    };

    let components = root.entry("components").or_insert_with(|| json!({}));
    let Some(components) = components.as_object_mut() else {
        return;
    };

    let schemes = components
        .entry("securitySchemes")
        .or_insert_with(|| json!({}));
    if let Some(schemes) = schemes.as_object_mut() {
        schemes.entry("bearerAuth").or_insert_with(|| {
            json!({
                "type": "http",
                "scheme": "bearer",
                "bearerFormat": "JWT"
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_has_bearer_scheme_and_paths() {
        let doc = serde_json::to_value(build_openapi().expect("openapi builds")).expect("json");

        assert_eq!(doc["components"]["securitySchemes"]["bearerAuth"]["scheme"], "bearer");
        assert!(doc["paths"].get("/api/health").is_some());
        assert!(doc["paths"].get("/api/access").is_some());
    }
}
