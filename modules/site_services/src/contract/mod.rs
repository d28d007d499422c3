//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::SiteServicesApi;
pub use error::SiteServicesError;
pub use model::{
    AuthContext, ContentId, ContentInclusion, FieldConstraint, FieldError, FieldRule, FieldType,
    IncludeDraft, IncludeSummary, PageSettings, ResolvedInclude, ServiceDefinition,
    ServiceInclude, ServiceSettings, ValidationResult,
};
