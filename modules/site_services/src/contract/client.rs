//! Native client trait for inter-module communication
//!
//! Page rendering and content editing code call into site services through this
//! trait. NO HTTP - direct function calls.

use super::{
    error::SiteServicesError,
    model::{
        AuthContext, ContentId, ContentInclusion, IncludeDraft, PageSettings, ResolvedInclude,
        ServiceDefinition, ServiceInclude, ValidationResult,
    },
};
use async_trait::async_trait;

/// Site services API for inter-module communication
#[async_trait]
pub trait SiteServicesApi: Send + Sync {
    // ===== Catalog =====

    /// List known service types in catalog order
    async fn list_services(&self) -> Vec<ServiceDefinition>;

    /// Get one service type
    async fn get_service(&self, service_name: &str) -> Result<ServiceDefinition, SiteServicesError>;

    /// Check proposed settings without saving
    async fn validate_settings(
        &self,
        service_name: &str,
        settings: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ValidationResult, SiteServicesError>;

    // ===== Includes =====

    async fn create_include(
        &self,
        draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError>;

    async fn update_include(
        &self,
        id: &str,
        draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError>;

    async fn delete_include(&self, id: &str, auth: &AuthContext) -> Result<(), SiteServicesError>;

    async fn get_include(&self, id: &str) -> Result<ServiceInclude, SiteServicesError>;

    async fn list_includes(&self) -> Result<Vec<ServiceInclude>, SiteServicesError>;

    // ===== Rendering =====

    /// Includes active on a page; `None` for pages that are not content items
    async fn resolve(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<Vec<ResolvedInclude>, SiteServicesError>;

    /// Resolved includes grouped per service for front-end loaders
    async fn page_settings(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<PageSettings, SiteServicesError>;

    // ===== Content authoring =====

    async fn list_editable_includes(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<ServiceInclude>, SiteServicesError>;

    async fn list_content_inclusions(
        &self,
        content_id: ContentId,
        auth: &AuthContext,
    ) -> Result<Vec<ContentInclusion>, SiteServicesError>;

    async fn set_content_inclusion(
        &self,
        include_id: &str,
        content_id: ContentId,
        included: bool,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError>;
}
