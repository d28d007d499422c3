//! Common test utilities: in-memory repository, recording publisher and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use site_services::contract::*;
use site_services::domain::events::{EventPublisher, IncludeEvent};
use site_services::domain::repository::ServiceIncludeRepository;
use site_services::domain::{Service, ServiceCatalog, ServiceOptions};
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Mock repository =====

/// Include storage on a `BTreeMap`, so iteration is already ordered by id
#[derive(Clone, Default)]
pub struct MockIncludeRepo {
    data: Arc<RwLock<BTreeMap<String, ServiceInclude>>>,
}

impl MockIncludeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an include without going through the service
    pub fn insert_raw(&self, include: ServiceInclude) {
        self.data.write().insert(include.id.clone(), include);
    }

    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    /// Print verbose information about repository state
    pub fn print_state(&self, context: &str) {
        let data = self.data.read();
        println!("\n========== Include Repository State: {} ==========", context);
        println!("Total includes: {}", data.len());
        for include in data.values() {
            println!(
                "  {} [{}] sitewide={} content={:?} editing={}",
                include.id,
                include.service_name,
                include.sitewide,
                include.content_ids,
                include.content_editing_enabled
            );
        }
        println!("====================================================\n");
    }
}

#[async_trait]
impl ServiceIncludeRepository for MockIncludeRepo {
    async fn insert(&self, include: &ServiceInclude) -> anyhow::Result<Option<ServiceInclude>> {
        let mut data = self.data.write();
        if data.contains_key(&include.id) {
            return Ok(None);
        }
        data.insert(include.id.clone(), include.clone());
        Ok(Some(include.clone()))
    }

    async fn upsert(&self, include: &ServiceInclude) -> anyhow::Result<ServiceInclude> {
        self.data
            .write()
            .insert(include.id.clone(), include.clone());
        Ok(include.clone())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<ServiceInclude>> {
        Ok(self.data.read().get(id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<ServiceInclude>> {
        Ok(self.data.read().values().cloned().collect())
    }

    async fn find_candidates(
        &self,
        content_id: Option<ContentId>,
    ) -> anyhow::Result<Vec<ServiceInclude>> {
        Ok(self
            .data
            .read()
            .values()
            .filter(|i| i.sitewide || content_id.is_some_and(|cid| i.lists_content(cid)))
            .cloned()
            .collect())
    }

    async fn find_specific(&self, content_editing_only: bool) -> anyhow::Result<Vec<ServiceInclude>> {
        Ok(self
            .data
            .read()
            .values()
            .filter(|i| !i.sitewide && (!content_editing_only || i.content_editing_enabled))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.data.write().remove(id).is_some())
    }
}

/// Repository whose every call fails, for storage error paths
pub struct FailingRepo;

#[async_trait]
impl ServiceIncludeRepository for FailingRepo {
    async fn insert(&self, _include: &ServiceInclude) -> anyhow::Result<Option<ServiceInclude>> {
        anyhow::bail!("connection refused")
    }

    async fn upsert(&self, _include: &ServiceInclude) -> anyhow::Result<ServiceInclude> {
        anyhow::bail!("connection refused")
    }

    async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<ServiceInclude>> {
        anyhow::bail!("connection refused")
    }

    async fn list_all(&self) -> anyhow::Result<Vec<ServiceInclude>> {
        anyhow::bail!("connection refused")
    }

    async fn find_candidates(
        &self,
        _content_id: Option<ContentId>,
    ) -> anyhow::Result<Vec<ServiceInclude>> {
        anyhow::bail!("connection refused")
    }

    async fn find_specific(&self, _content_editing_only: bool) -> anyhow::Result<Vec<ServiceInclude>> {
        anyhow::bail!("connection refused")
    }

    async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
        anyhow::bail!("connection refused")
    }
}

// ===== Recording publisher =====

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<RwLock<Vec<IncludeEvent>>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<IncludeEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: IncludeEvent) -> anyhow::Result<()> {
        self.events.write().push(event);
        Ok(())
    }
}

// ===== Service construction =====

pub struct TestContext {
    pub service: Arc<Service>,
    pub repo: MockIncludeRepo,
    pub events: RecordingPublisher,
}

pub fn create_test_context_with(options: ServiceOptions) -> TestContext {
    let catalog = Arc::new(ServiceCatalog::builtin().expect("built-in catalog loads"));
    let repo = MockIncludeRepo::new();
    let events = RecordingPublisher::default();
    let service = Arc::new(Service::new(
        catalog,
        Arc::new(repo.clone()),
        Arc::new(events.clone()),
        options,
    ));
    TestContext {
        service,
        repo,
        events,
    }
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(ServiceOptions::default())
}

// ===== Fixtures =====

pub fn admin() -> AuthContext {
    AuthContext::administrator(Some("site-admin".to_string()))
}

pub fn author() -> AuthContext {
    AuthContext::author(Some("content-author".to_string()))
}

pub fn settings(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {}", other),
    }
}

pub fn draft(
    id: &str,
    service_name: &str,
    service_settings: Value,
    sitewide: bool,
    content_ids: &[ContentId],
) -> IncludeDraft {
    IncludeDraft {
        id: id.to_string(),
        label: format!("{} include", id),
        service_name: service_name.to_string(),
        service_settings: settings(service_settings),
        sitewide,
        content_ids: content_ids.to_vec(),
        content_editing_enabled: false,
    }
}

/// LiveChat include with a valid license
pub fn livechat_draft(id: &str, sitewide: bool, content_ids: &[ContentId]) -> IncludeDraft {
    draft(
        id,
        "livechat",
        serde_json::json!({"license_id": "123456"}),
        sitewide,
        content_ids,
    )
}

/// Statuspage include with a valid page id
pub fn statuspage_draft(id: &str, sitewide: bool, content_ids: &[ContentId]) -> IncludeDraft {
    draft(
        id,
        "statuspage",
        serde_json::json!({"page_id": "abcdefghijkl"}),
        sitewide,
        content_ids,
    )
}

pub fn resolved_ids(resolved: &[ResolvedInclude]) -> Vec<&str> {
    resolved
        .iter()
        .map(|r| r.source_include_id.as_str())
        .collect()
}
