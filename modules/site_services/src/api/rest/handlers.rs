//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{AuthContext, ContentId};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

// ===== Catalog Handlers =====

/// List known service types
pub async fn list_services(service: Arc<Service>) -> Json<ServicesListResponse> {
    let items: Vec<ServiceDefinitionDto> =
        service.list_services().into_iter().map(Into::into).collect();
    let total = items.len();

    Json(ServicesListResponse { items, total })
}

/// Get a service type
pub async fn get_service(
    service: Arc<Service>,
    Path(service_name): Path<String>,
) -> Result<Json<ServiceDefinitionDto>, Problem> {
    let definition = service
        .get_service(&service_name)
        .map_err(map_domain_error)?;

    Ok(Json(definition.into()))
}

/// Validate proposed settings without saving
pub async fn validate_settings(
    service: Arc<Service>,
    Path(service_name): Path<String>,
    Json(req): Json<ValidateSettingsRequest>,
) -> Result<Json<ValidationResponse>, Problem> {
    let result = service
        .validate_settings(&service_name, &req.service_settings)
        .map_err(map_domain_error)?;

    Ok(Json(result.into()))
}

// ===== Include Handlers =====

/// List all includes
pub async fn list_includes(service: Arc<Service>) -> Result<Json<IncludesListResponse>, Problem> {
    let includes = service.list_includes().await.map_err(map_domain_error)?;

    let items: Vec<ServiceIncludeDto> = includes.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(IncludesListResponse { items, total }))
}

/// Get a specific include
pub async fn get_include(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<Json<ServiceIncludeDto>, Problem> {
    let include = service.get_include(&id).await.map_err(map_domain_error)?;

    Ok(Json(include.into()))
}

/// Create a new include
pub async fn create_include(
    service: Arc<Service>,
    auth: AuthContext,
    Json(req): Json<CreateIncludeRequest>,
) -> Result<(StatusCode, Json<ServiceIncludeDto>), Problem> {
    let include = service
        .create_include(req.into(), &auth)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(include.into())))
}

/// Update an existing include
pub async fn update_include(
    service: Arc<Service>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateIncludeRequest>,
) -> Result<Json<ServiceIncludeDto>, Problem> {
    let include = service
        .update_include(&id, req.into_draft(id.clone()), &auth)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(include.into()))
}

/// Delete an include
pub async fn delete_include(
    service: Arc<Service>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .delete_include(&id, &auth)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Rendering Handlers =====

/// Includes active on a page
pub async fn resolve(
    service: Arc<Service>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ResolvedListResponse>, Problem> {
    let resolved = service
        .resolve(query.content_id)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ResolvedIncludeDto> = resolved.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(ResolvedListResponse { items, total }))
}

/// Resolved includes grouped per service
pub async fn page_settings(
    service: Arc<Service>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<PageSettingsResponse>, Problem> {
    let page = service
        .page_settings(query.content_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(page.into()))
}

// ===== Content Authoring Handlers =====

/// Editable includes with their state for one content item
pub async fn list_content_inclusions(
    service: Arc<Service>,
    auth: AuthContext,
    Path(content_id): Path<ContentId>,
) -> Result<Json<ContentInclusionsListResponse>, Problem> {
    let inclusions = service
        .list_content_inclusions(content_id, &auth)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ContentInclusionsListResponse {
        content_id,
        items: inclusions.into_iter().map(Into::into).collect(),
    }))
}

/// Attach content to or detach it from an include
pub async fn set_content_inclusion(
    service: Arc<Service>,
    auth: AuthContext,
    Path((content_id, include_id)): Path<(ContentId, String)>,
    Json(req): Json<SetContentInclusionRequest>,
) -> Result<Json<ContentInclusionDto>, Problem> {
    let include = service
        .set_content_inclusion(&include_id, content_id, req.included, &auth)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ContentInclusionDto {
        included: include.lists_content(content_id),
        id: include.id,
        label: include.label,
        service_name: include.service_name,
    }))
}
