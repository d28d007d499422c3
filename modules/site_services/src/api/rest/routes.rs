//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::contract::{AuthContext, ContentId};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Register all REST routes
///
/// The caller's `AuthContext` is read from a request extension installed by
/// host middleware; requests without one are treated as non-administrators.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Catalog endpoints
        .route("/site-services/services", get(list_services_handler))
        .route("/site-services/services/{name}", get(get_service_handler))
        .route(
            "/site-services/services/{name}/validate",
            post(validate_settings_handler),
        )
        // Include endpoints
        .route(
            "/site-services/includes",
            get(list_includes_handler).post(create_include_handler),
        )
        .route(
            "/site-services/includes/{id}",
            get(get_include_handler)
                .put(update_include_handler)
                .delete(delete_include_handler),
        )
        // Rendering endpoints
        .route("/site-services/resolve", get(resolve_handler))
        .route("/site-services/page-settings", get(page_settings_handler))
        // Content authoring endpoints
        .route(
            "/site-services/content/{content_id}/includes",
            get(list_content_inclusions_handler),
        )
        .route(
            "/site-services/content/{content_id}/includes/{id}",
            put(set_content_inclusion_handler),
        )
        // Add service as extension for handlers
        .layer(Extension(service))
}

fn caller(auth: Option<Extension<AuthContext>>) -> AuthContext {
    auth.map(|Extension(auth)| auth).unwrap_or_default()
}

// ===== Handler wrappers that extract service from Extension =====

async fn list_services_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<ServicesListResponse> {
    handlers::list_services(service).await
}

async fn get_service_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<ServiceDefinitionDto>, Problem> {
    handlers::get_service(service, path).await
}

async fn validate_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<ValidateSettingsRequest>,
) -> Result<Json<ValidationResponse>, Problem> {
    handlers::validate_settings(service, path, json).await
}

async fn list_includes_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<IncludesListResponse>, Problem> {
    handlers::list_includes(service).await
}

async fn get_include_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<ServiceIncludeDto>, Problem> {
    handlers::get_include(service, path).await
}

async fn create_include_handler(
    Extension(service): Extension<Arc<Service>>,
    auth: Option<Extension<AuthContext>>,
    json: Json<CreateIncludeRequest>,
) -> Result<(StatusCode, Json<ServiceIncludeDto>), Problem> {
    handlers::create_include(service, caller(auth), json).await
}

async fn update_include_handler(
    Extension(service): Extension<Arc<Service>>,
    auth: Option<Extension<AuthContext>>,
    path: Path<String>,
    json: Json<UpdateIncludeRequest>,
) -> Result<Json<ServiceIncludeDto>, Problem> {
    handlers::update_include(service, caller(auth), path, json).await
}

async fn delete_include_handler(
    Extension(service): Extension<Arc<Service>>,
    auth: Option<Extension<AuthContext>>,
    path: Path<String>,
) -> Result<StatusCode, Problem> {
    handlers::delete_include(service, caller(auth), path).await
}

async fn resolve_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<ContentQuery>,
) -> Result<Json<ResolvedListResponse>, Problem> {
    handlers::resolve(service, query).await
}

async fn page_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<ContentQuery>,
) -> Result<Json<PageSettingsResponse>, Problem> {
    handlers::page_settings(service, query).await
}

async fn list_content_inclusions_handler(
    Extension(service): Extension<Arc<Service>>,
    auth: Option<Extension<AuthContext>>,
    path: Path<ContentId>,
) -> Result<Json<ContentInclusionsListResponse>, Problem> {
    handlers::list_content_inclusions(service, caller(auth), path).await
}

async fn set_content_inclusion_handler(
    Extension(service): Extension<Arc<Service>>,
    auth: Option<Extension<AuthContext>>,
    path: Path<(ContentId, String)>,
    json: Json<SetContentInclusionRequest>,
) -> Result<Json<ContentInclusionDto>, Problem> {
    handlers::set_content_inclusion(service, caller(auth), path, json).await
}
