//! Contract error types for site services
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::FieldError;

/// Site services domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteServicesError {
    /// Service name is not in the catalog
    #[error("Unrecognized third-party service selected: {service_name}")]
    UnknownService { service_name: String },

    /// Include not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Duplicate id or similar
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// One or more field violations, all reported at once
    #[error("Validation failed: {}", join_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Malformed request outside of the settings fields
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Caller may not perform the operation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Storage or other unexpected failure
    #[error("Internal error")]
    Internal,
}

impl SiteServicesError {
    pub(crate) fn include_not_found(id: &str) -> Self {
        Self::NotFound {
            resource: "service_include".to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn unknown_service(service_name: &str) -> Self {
        Self::UnknownService {
            service_name: service_name.to_string(),
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = SiteServicesError::Validation {
            errors: vec![
                FieldError::new("license_id", "License ID is required."),
                FieldError::new("college_id", "College ID must be at most 60 characters."),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("license_id"));
        assert!(text.contains("college_id"));
    }

    #[test]
    fn test_unknown_service_message() {
        let err = SiteServicesError::unknown_service("myspace");
        assert_eq!(
            err.to_string(),
            "Unrecognized third-party service selected: myspace"
        );
    }
}
