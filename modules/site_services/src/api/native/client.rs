//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AuthContext, ContentId, ContentInclusion, IncludeDraft, PageSettings, ResolvedInclude,
    ServiceDefinition, ServiceInclude, SiteServicesApi, SiteServicesError, ValidationResult,
};
use crate::domain::Service;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// This client is used for in-process communication without HTTP overhead,
/// e.g. by page rendering code asking which includes to emit.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SiteServicesApi for NativeClient {
    async fn list_services(&self) -> Vec<ServiceDefinition> {
        self.service.list_services()
    }

    async fn get_service(&self, service_name: &str) -> Result<ServiceDefinition, SiteServicesError> {
        self.service.get_service(service_name)
    }

    async fn validate_settings(
        &self,
        service_name: &str,
        settings: &Map<String, Value>,
    ) -> Result<ValidationResult, SiteServicesError> {
        self.service.validate_settings(service_name, settings)
    }

    async fn create_include(
        &self,
        draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        self.service.create_include(draft, auth).await
    }

    async fn update_include(
        &self,
        id: &str,
        draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        self.service.update_include(id, draft, auth).await
    }

    async fn delete_include(&self, id: &str, auth: &AuthContext) -> Result<(), SiteServicesError> {
        self.service.delete_include(id, auth).await
    }

    async fn get_include(&self, id: &str) -> Result<ServiceInclude, SiteServicesError> {
        self.service.get_include(id).await
    }

    async fn list_includes(&self) -> Result<Vec<ServiceInclude>, SiteServicesError> {
        self.service.list_includes().await
    }

    async fn resolve(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<Vec<ResolvedInclude>, SiteServicesError> {
        self.service.resolve(content_id).await
    }

    async fn page_settings(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<PageSettings, SiteServicesError> {
        self.service.page_settings(content_id).await
    }

    async fn list_editable_includes(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<ServiceInclude>, SiteServicesError> {
        self.service.list_editable_includes(auth).await
    }

    async fn list_content_inclusions(
        &self,
        content_id: ContentId,
        auth: &AuthContext,
    ) -> Result<Vec<ContentInclusion>, SiteServicesError> {
        self.service.list_content_inclusions(content_id, auth).await
    }

    async fn set_content_inclusion(
        &self,
        include_id: &str,
        content_id: ContentId,
        included: bool,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        self.service
            .set_content_inclusion(include_id, content_id, included, auth)
            .await
    }
}
