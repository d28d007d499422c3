//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract::{self, FieldConstraint};

// ===== Catalog conversions =====

impl From<contract::ServiceDefinition> for ServiceDefinitionDto {
    fn from(definition: contract::ServiceDefinition) -> Self {
        Self {
            name: definition.name,
            label: definition.label,
            content_label: definition.content_label,
            single_instance: definition.single_instance,
            fields: definition.fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::FieldRule> for FieldRuleDto {
    fn from(rule: contract::FieldRule) -> Self {
        let mut dto = Self {
            name: rule.name,
            label: rule.label,
            field_type: rule.field_type.as_str().to_string(),
            required: rule.required,
            pattern: None,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        };

        match rule.constraint {
            FieldConstraint::None => {}
            FieldConstraint::Pattern {
                regex,
                min_length,
                max_length,
            } => {
                dto.pattern = Some(regex.as_str().to_string());
                dto.min_length = min_length;
                dto.max_length = max_length;
            }
            FieldConstraint::Length {
                min_length,
                max_length,
            } => {
                dto.min_length = min_length;
                dto.max_length = max_length;
            }
            FieldConstraint::Range { min, max } => {
                dto.min = Some(min);
                dto.max = Some(max);
            }
        }

        dto
    }
}

impl From<contract::FieldError> for FieldErrorDto {
    fn from(error: contract::FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

impl From<contract::ValidationResult> for ValidationResponse {
    fn from(result: contract::ValidationResult) -> Self {
        match result {
            contract::ValidationResult::Valid(settings) => Self {
                valid: true,
                service_settings: Some(settings),
                errors: Vec::new(),
            },
            contract::ValidationResult::Invalid(errors) => Self {
                valid: false,
                service_settings: None,
                errors: errors.into_iter().map(Into::into).collect(),
            },
        }
    }
}

// ===== Include conversions =====

impl From<contract::ServiceInclude> for ServiceIncludeDto {
    fn from(include: contract::ServiceInclude) -> Self {
        Self {
            included_on: include.summary().to_string(),
            id: include.id,
            label: include.label,
            service_name: include.service_name,
            service_settings: include.service_settings,
            sitewide: include.sitewide,
            content_ids: include.content_ids,
            content_editing_enabled: include.content_editing_enabled,
            created_at: include.created_at,
            updated_at: include.updated_at,
        }
    }
}

impl From<CreateIncludeRequest> for contract::IncludeDraft {
    fn from(req: CreateIncludeRequest) -> Self {
        Self {
            id: req.id,
            label: req.label,
            service_name: req.service_name,
            service_settings: req.service_settings,
            sitewide: req.sitewide,
            content_ids: req.content_ids,
            content_editing_enabled: req.content_editing_enabled,
        }
    }
}

impl UpdateIncludeRequest {
    /// Draft for the include at `id`
    pub fn into_draft(self, id: String) -> contract::IncludeDraft {
        contract::IncludeDraft {
            id,
            label: self.label,
            service_name: self.service_name,
            service_settings: self.service_settings,
            sitewide: self.sitewide,
            content_ids: self.content_ids,
            content_editing_enabled: self.content_editing_enabled,
        }
    }
}

// ===== Rendering conversions =====

impl From<contract::ResolvedInclude> for ResolvedIncludeDto {
    fn from(resolved: contract::ResolvedInclude) -> Self {
        Self {
            service_name: resolved.service_name,
            service_settings: resolved.service_settings,
            source_include_id: resolved.source_include_id,
            label: resolved.label,
        }
    }
}

impl From<contract::PageSettings> for PageSettingsResponse {
    fn from(page: contract::PageSettings) -> Self {
        Self {
            services: page
                .into_iter()
                .map(|(service, includes)| {
                    (service, includes.into_iter().map(Into::into).collect())
                })
                .collect(),
        }
    }
}

impl From<contract::ContentInclusion> for ContentInclusionDto {
    fn from(inclusion: contract::ContentInclusion) -> Self {
        Self {
            id: inclusion.include.id,
            label: inclusion.include.label,
            service_name: inclusion.include.service_name,
            included: inclusion.included,
        }
    }
}
