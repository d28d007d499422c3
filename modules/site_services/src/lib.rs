//! Site Services Module
//!
//! Third-party service includes for HyperSpot sites. Administrators attach a
//! service from a static catalog (live chat, chatbots, status banners) with
//! validated settings to all pages or to specific content; page rendering asks
//! which includes are active for a content item.

// Public exports
pub mod contract;
pub use contract::{
    client::SiteServicesApi, error::SiteServicesError, AuthContext, ContentId, ContentInclusion,
    FieldError, IncludeDraft, PageSettings, ResolvedInclude, ServiceDefinition, ServiceInclude,
    ValidationResult,
};

pub mod module;
pub use module::SiteServicesModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
