/// Domain events for service includes
///
/// Events are published whenever an administrator or content author changes an
/// include. The default publisher writes them to the `tracing` audit target.
use crate::contract::{ContentId, ServiceInclude};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain event types for service includes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum IncludeEvent {
    /// Include was created
    IncludeCreated(IncludeChangedEvent),
    /// Include settings or scope were updated
    IncludeUpdated(IncludeChangedEvent),
    /// Include was deleted
    IncludeDeleted(IncludeDeletedEvent),
    /// A content author attached or detached content
    ContentInclusionChanged(ContentInclusionChangedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeChangedEvent {
    pub include_id: String,
    pub label: String,
    pub service_name: String,
    pub sitewide: bool,
    pub content_count: usize,
    pub timestamp: DateTime<Utc>,
    /// User who performed the action (if available)
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeDeletedEvent {
    pub include_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInclusionChangedEvent {
    pub include_id: String,
    pub content_id: ContentId,
    pub included: bool,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: IncludeEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: IncludeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes events as structured `tracing` records on the `site_services::audit` target
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: IncludeEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(target: "site_services::audit", event = %payload, "service include event");
        Ok(())
    }
}

impl IncludeEvent {
    pub fn created(include: &ServiceInclude, user_id: Option<String>) -> Self {
        IncludeEvent::IncludeCreated(IncludeChangedEvent::from_include(include, user_id))
    }

    pub fn updated(include: &ServiceInclude, user_id: Option<String>) -> Self {
        IncludeEvent::IncludeUpdated(IncludeChangedEvent::from_include(include, user_id))
    }

    pub fn deleted(include_id: String, user_id: Option<String>) -> Self {
        IncludeEvent::IncludeDeleted(IncludeDeletedEvent {
            include_id,
            timestamp: Utc::now(),
            user_id,
        })
    }

    pub fn content_inclusion_changed(
        include_id: String,
        content_id: ContentId,
        included: bool,
        user_id: Option<String>,
    ) -> Self {
        IncludeEvent::ContentInclusionChanged(ContentInclusionChangedEvent {
            include_id,
            content_id,
            included,
            timestamp: Utc::now(),
            user_id,
        })
    }
}

impl IncludeChangedEvent {
    fn from_include(include: &ServiceInclude, user_id: Option<String>) -> Self {
        Self {
            include_id: include.id.clone(),
            label: include.label.clone(),
            service_name: include.service_name.clone(),
            sitewide: include.sitewide,
            content_count: include.content_ids.len(),
            timestamp: Utc::now(),
            user_id,
        }
    }
}
