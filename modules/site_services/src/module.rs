//! Module declaration and lifecycle implementation

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::SiteServicesApi;
use crate::domain::{Service, ServiceCatalog, TracingEventPublisher};
use crate::infra::storage::{migrations::Migrator, SeaOrmServiceIncludeRepository};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Site services module
pub struct SiteServicesModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for SiteServicesModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl SiteServicesModule {
    /// Wire catalog, storage and domain service
    pub async fn init(&self, cfg: Config, db: DatabaseConnection) -> Result<()> {
        let catalog = match &cfg.catalog_path {
            Some(path) => ServiceCatalog::from_path(path)
                .with_context(|| format!("Failed to load service catalog {}", path.display()))?,
            None => ServiceCatalog::builtin().context("Failed to load built-in service catalog")?,
        };
        tracing::info!(services = catalog.len(), "Service catalog loaded");

        if cfg.run_migrations {
            self.migrate(&db).await?;
        }

        let repo = Arc::new(SeaOrmServiceIncludeRepository::new(Arc::new(db)));
        let event_publisher = Arc::new(TracingEventPublisher);

        let service = Arc::new(Service::new(
            Arc::new(catalog),
            repo,
            event_publisher,
            cfg.service_options(),
        ));
        *self.service.write() = Some(service);
        *self.config.write() = cfg;

        tracing::info!("Site services initialized");
        Ok(())
    }

    /// Apply pending database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Site services migrations completed");
        Ok(())
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering site services REST routes");
        Ok(crate::api::rest::routes::register_routes(router, service))
    }

    /// In-process client for rendering and content editing code
    pub fn client(&self) -> Result<Arc<dyn SiteServicesApi>> {
        Ok(Arc::new(NativeClient::new(self.service()?)))
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
