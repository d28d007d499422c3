//! Repository trait for data access
//!
//! This trait defines the interface for service include storage.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{ContentId, ServiceInclude};
use anyhow::Result;
use async_trait::async_trait;

/// Repository for service includes
#[async_trait]
pub trait ServiceIncludeRepository: Send + Sync {
    /// Insert a new include with its content list; `None` if the id is already taken
    async fn insert(&self, include: &ServiceInclude) -> Result<Option<ServiceInclude>>;

    /// Insert or replace an include together with its content list, atomically
    async fn upsert(&self, include: &ServiceInclude) -> Result<ServiceInclude>;

    /// Find an include by id
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceInclude>>;

    /// List all includes ordered by id
    async fn list_all(&self) -> Result<Vec<ServiceInclude>>;

    /// Includes that are sitewide or list `content_id`, ordered by id
    async fn find_candidates(&self, content_id: Option<ContentId>) -> Result<Vec<ServiceInclude>>;

    /// Includes that are not sitewide, ordered by id
    async fn find_specific(&self, content_editing_only: bool) -> Result<Vec<ServiceInclude>>;

    /// Delete an include; returns false if it did not exist
    async fn delete(&self, id: &str) -> Result<bool>;
}
