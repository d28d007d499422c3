//! REST DTOs with serde derives for HTTP API

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

// ===== Catalog DTOs =====

/// Service type response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceDefinitionDto {
    /// Service name
    #[schema(example = "livechat")]
    pub name: String,

    #[schema(example = "LiveChat")]
    pub label: String,

    /// Label on the content editing form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_label: Option<String>,

    pub single_instance: bool,

    /// Declared settings fields, in declaration order
    pub fields: Vec<FieldRuleDto>,
}

/// Settings field rule DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldRuleDto {
    #[schema(example = "license_id")]
    pub name: String,

    pub label: String,

    /// text, checkbox or number
    #[serde(rename = "type")]
    #[schema(example = "text")]
    pub field_type: String,

    pub required: bool,

    /// Anchored regular expression the whole value must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// Settings validation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateSettingsRequest {
    /// Proposed settings keyed by field name
    #[serde(default)]
    #[schema(value_type = Object)]
    pub service_settings: serde_json::Map<String, serde_json::Value>,
}

/// Settings validation outcome
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,

    /// Normalized settings, present when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub service_settings: Option<IndexMap<String, serde_json::Value>>,

    /// Every field violation, in field declaration order
    pub errors: Vec<FieldErrorDto>,
}

/// Single field violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    #[schema(example = "license_id")]
    pub field: String,
    pub message: String,
}

// ===== Include DTOs =====

/// Service include response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceIncludeDto {
    /// Machine name
    #[schema(example = "chat_main")]
    pub id: String,

    pub label: String,

    #[schema(example = "livechat")]
    pub service_name: String,

    /// Normalized settings keyed by field name
    #[schema(value_type = Object)]
    pub service_settings: IndexMap<String, serde_json::Value>,

    pub sitewide: bool,

    /// Excluded content when sitewide, included content otherwise
    pub content_ids: Vec<i64>,

    pub content_editing_enabled: bool,

    /// Where the include applies, e.g. "All pages" or "3 pages"
    #[schema(example = "All pages")]
    pub included_on: String,

    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Create include request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIncludeRequest {
    /// Machine name: lowercase letters, digits and underscores
    #[schema(example = "chat_main")]
    pub id: String,

    pub label: String,

    #[schema(example = "livechat")]
    pub service_name: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub service_settings: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub sitewide: bool,

    #[serde(default)]
    pub content_ids: Vec<i64>,

    #[serde(default)]
    pub content_editing_enabled: bool,
}

/// Update include request; the service type cannot change
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateIncludeRequest {
    pub label: String,

    pub service_name: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub service_settings: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub sitewide: bool,

    #[serde(default)]
    pub content_ids: Vec<i64>,

    #[serde(default)]
    pub content_editing_enabled: bool,
}

// ===== Rendering DTOs =====

/// Include active on a page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedIncludeDto {
    pub service_name: String,

    #[schema(value_type = Object)]
    pub service_settings: IndexMap<String, serde_json::Value>,

    pub source_include_id: String,

    pub label: String,
}

/// Page context query
#[derive(Debug, Clone, Deserialize)]
pub struct ContentQuery {
    /// Absent for pages that are not content items
    pub content_id: Option<i64>,
}

/// Resolved includes grouped by service name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageSettingsResponse {
    pub services: BTreeMap<String, Vec<ResolvedIncludeDto>>,
}

// ===== Content Authoring DTOs =====

/// Editable include and whether it is attached to the content item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentInclusionDto {
    pub id: String,

    pub label: String,

    pub service_name: String,

    pub included: bool,
}

/// Attach or detach request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetContentInclusionRequest {
    pub included: bool,
}

// ===== List Response DTOs =====

/// List of service types
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServicesListResponse {
    pub items: Vec<ServiceDefinitionDto>,

    /// Total count
    pub total: usize,
}

/// List of includes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IncludesListResponse {
    pub items: Vec<ServiceIncludeDto>,

    /// Total count
    pub total: usize,
}

/// Resolved includes in evaluation order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedListResponse {
    pub items: Vec<ResolvedIncludeDto>,

    /// Total count
    pub total: usize,
}

/// Editable includes for one content item
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContentInclusionsListResponse {
    pub content_id: i64,

    pub items: Vec<ContentInclusionDto>,
}

// Note: Conversion implementations live in mapper.rs
