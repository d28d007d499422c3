//! Domain layer - business logic and services

pub mod catalog;
pub mod events;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod validation;

pub use catalog::{CatalogError, ServiceCatalog};
pub use events::{EventPublisher, IncludeEvent, NoOpEventPublisher, TracingEventPublisher};
pub use repository::ServiceIncludeRepository;
pub use resolver::{ExclusionMode, IncludeResolver};
pub use service::{Service, ServiceOptions};
pub use validation::SettingsValidator;
