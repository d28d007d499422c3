//! Domain service - business logic orchestration

use super::catalog::ServiceCatalog;
use super::events::{EventPublisher, IncludeEvent};
use super::repository::ServiceIncludeRepository;
use super::resolver::{ExclusionMode, IncludeResolver};
use super::validation::{
    normalize_content_ids, validate_include_id, validate_label, SettingsValidator,
};
use crate::contract::{
    AuthContext, ContentId, ContentInclusion, FieldError, IncludeDraft, PageSettings,
    ResolvedInclude, ServiceDefinition, ServiceInclude, SiteServicesError, ValidationResult,
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default maximum label length, as in the admin form
pub const DEFAULT_MAX_LABEL_LENGTH: usize = 255;

/// Tunables for the domain service
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub exclusion_mode: ExclusionMode,
    pub max_label_length: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            exclusion_mode: ExclusionMode::PerCandidate,
            max_label_length: DEFAULT_MAX_LABEL_LENGTH,
        }
    }
}

/// Domain service for service includes
pub struct Service {
    catalog: Arc<ServiceCatalog>,
    repo: Arc<dyn ServiceIncludeRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    validator: SettingsValidator,
    resolver: IncludeResolver,
    options: ServiceOptions,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        catalog: Arc<ServiceCatalog>,
        repo: Arc<dyn ServiceIncludeRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            validator: SettingsValidator::new(catalog.clone()),
            resolver: IncludeResolver::new(repo.clone(), catalog.clone(), options.exclusion_mode),
            catalog,
            repo,
            event_publisher,
            options,
        }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    // ===== Catalog Operations =====

    /// List known service types in catalog order
    pub fn list_services(&self) -> Vec<ServiceDefinition> {
        self.catalog.list_definitions().to_vec()
    }

    /// Get a service type
    pub fn get_service(&self, service_name: &str) -> Result<ServiceDefinition, SiteServicesError> {
        self.catalog.get_definition(service_name).cloned()
    }

    /// Validate settings for a known service without saving
    pub fn validate_settings(
        &self,
        service_name: &str,
        settings: &Map<String, Value>,
    ) -> Result<ValidationResult, SiteServicesError> {
        self.catalog.get_definition(service_name)?;
        Ok(self.validator.validate(service_name, settings))
    }

    // ===== Include Operations =====

    /// Create a new include
    pub async fn create_include(
        &self,
        draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        require_administrator(auth)?;
        validate_include_id(&draft.id)?;

        let now = Utc::now();
        let include = self.build_include(draft, now, now)?;
        let saved = self
            .repo
            .insert(&include)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| SiteServicesError::Conflict {
                reason: format!("Service include already exists: {}", include.id),
            })?;

        tracing::info!(
            include_id = %saved.id,
            service = %saved.service_name,
            sitewide = saved.sitewide,
            "Service include created"
        );
        self.publish(IncludeEvent::created(&saved, auth.user_id.clone()))
            .await;

        Ok(saved)
    }

    /// Update an existing include. The service type cannot change.
    pub async fn update_include(
        &self,
        id: &str,
        mut draft: IncludeDraft,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        require_administrator(auth)?;
        let existing = self.get_include(id).await?;

        if draft.service_name != existing.service_name {
            return Err(SiteServicesError::Validation {
                errors: vec![FieldError::new(
                    "service_name",
                    "To use a different service, add a new include.",
                )],
            });
        }

        draft.id = existing.id.clone();
        let include = self.build_include(draft, existing.created_at, Utc::now())?;
        let saved = self.save(&include).await?;

        tracing::info!(include_id = %saved.id, service = %saved.service_name, "Service include updated");
        self.publish(IncludeEvent::updated(&saved, auth.user_id.clone()))
            .await;

        Ok(saved)
    }

    /// Delete an include
    pub async fn delete_include(&self, id: &str, auth: &AuthContext) -> Result<(), SiteServicesError> {
        require_administrator(auth)?;
        let deleted = self.repo.delete(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(SiteServicesError::include_not_found(id));
        }

        tracing::info!(include_id = %id, "Service include deleted");
        self.publish(IncludeEvent::deleted(id.to_string(), auth.user_id.clone()))
            .await;

        Ok(())
    }

    /// Get an include by id
    pub async fn get_include(&self, id: &str) -> Result<ServiceInclude, SiteServicesError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| SiteServicesError::include_not_found(id))
    }

    /// List all includes ordered by id
    pub async fn list_includes(&self) -> Result<Vec<ServiceInclude>, SiteServicesError> {
        self.repo.list_all().await.map_err(storage_error)
    }

    // ===== Rendering =====

    /// Includes active on a page
    pub async fn resolve(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<Vec<ResolvedInclude>, SiteServicesError> {
        self.resolver.resolve(content_id).await
    }

    /// Resolved includes grouped per service for front-end loaders
    pub async fn page_settings(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<PageSettings, SiteServicesError> {
        self.resolver.page_settings(content_id).await
    }

    // ===== Content Authoring =====

    /// Includes the caller may attach to or detach from content.
    ///
    /// Only specific-content includes are listed; non-administrators only see
    /// those with content editing enabled.
    pub async fn list_editable_includes(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<ServiceInclude>, SiteServicesError> {
        self.repo
            .find_specific(!auth.is_administrator)
            .await
            .map_err(storage_error)
    }

    /// Editable includes with their attachment state for one content item
    pub async fn list_content_inclusions(
        &self,
        content_id: ContentId,
        auth: &AuthContext,
    ) -> Result<Vec<ContentInclusion>, SiteServicesError> {
        Ok(self
            .list_editable_includes(auth)
            .await?
            .into_iter()
            .map(|include| ContentInclusion {
                included: include.lists_content(content_id),
                include,
            })
            .collect())
    }

    /// Attach (`included == true`) or detach content from an editable include
    pub async fn set_content_inclusion(
        &self,
        include_id: &str,
        content_id: ContentId,
        included: bool,
        auth: &AuthContext,
    ) -> Result<ServiceInclude, SiteServicesError> {
        let mut include = self.get_include(include_id).await?;

        if include.sitewide {
            return Err(SiteServicesError::Forbidden {
                reason: format!(
                    "Service include '{}' applies to all pages and cannot be toggled per content",
                    include_id
                ),
            });
        }
        if !auth.is_administrator && !include.content_editing_enabled {
            return Err(SiteServicesError::Forbidden {
                reason: format!(
                    "Content editing is not enabled for service include '{}'",
                    include_id
                ),
            });
        }

        if include.lists_content(content_id) == included {
            return Ok(include);
        }

        if included {
            include.content_ids.push(content_id);
        } else {
            include.content_ids.retain(|id| *id != content_id);
        }
        include.updated_at = Utc::now();
        let saved = self.save(&include).await?;

        tracing::info!(
            include_id = %saved.id,
            content_id,
            included,
            "Service include content association changed"
        );
        self.publish(IncludeEvent::content_inclusion_changed(
            saved.id.clone(),
            content_id,
            included,
            auth.user_id.clone(),
        ))
        .await;

        Ok(saved)
    }

    // ===== Helper Methods =====

    /// Validate a draft and turn it into a storable include
    fn build_include(
        &self,
        draft: IncludeDraft,
        created_at: chrono::DateTime<Utc>,
        updated_at: chrono::DateTime<Utc>,
    ) -> Result<ServiceInclude, SiteServicesError> {
        self.catalog.get_definition(&draft.service_name)?;
        validate_label(&draft.label, self.options.max_label_length)?;

        let service_settings = self
            .validator
            .validate(&draft.service_name, &draft.service_settings)
            .into_result()
            .map_err(|errors| SiteServicesError::Validation { errors })?;

        Ok(ServiceInclude {
            id: draft.id,
            label: draft.label.trim().to_string(),
            service_name: draft.service_name,
            service_settings,
            sitewide: draft.sitewide,
            content_ids: normalize_content_ids(draft.content_ids),
            content_editing_enabled: draft.content_editing_enabled,
            created_at,
            updated_at,
        })
    }

    async fn save(&self, include: &ServiceInclude) -> Result<ServiceInclude, SiteServicesError> {
        self.repo.upsert(include).await.map_err(storage_error)
    }

    async fn publish(&self, event: IncludeEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            // Log error but don't fail the operation
            tracing::warn!(error = %e, "Failed to publish service include event");
        }
    }
}

fn require_administrator(auth: &AuthContext) -> Result<(), SiteServicesError> {
    if auth.is_administrator {
        Ok(())
    } else {
        Err(SiteServicesError::Forbidden {
            reason: "Administering service includes requires the administrator permission"
                .to_string(),
        })
    }
}

fn storage_error(error: anyhow::Error) -> SiteServicesError {
    tracing::error!(error = ?error, "Service include storage failure");
    SiteServicesError::Internal
}
