//! Include resolution: which service includes are active on a page
//!
//! A sitewide include applies to every page except the content it lists; a
//! specific-content include applies only to the content it lists. Pages that
//! are not content items (`None`) only get sitewide includes.

use super::catalog::ServiceCatalog;
use super::repository::ServiceIncludeRepository;
use crate::contract::{ContentId, PageSettings, ResolvedInclude, ServiceInclude, SiteServicesError};
use serde::Deserialize;
use std::sync::Arc;

/// How a sitewide exclusion affects the remaining candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionMode {
    /// Skip only the excluded include
    #[default]
    PerCandidate,
    /// Stop evaluating all remaining candidates at the first exclusion.
    /// Kept for sites that depend on the legacy behaviour.
    ShortCircuit,
}

/// Decision for one candidate in the context of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidacy {
    /// Not a candidate for this page
    NotApplicable,
    /// Active on this page
    Include,
    /// Sitewide, but this content is on its exclusion list
    ExcludedForContent,
}

/// Classify an include for the given page
pub fn candidacy(include: &ServiceInclude, content_id: Option<ContentId>) -> Candidacy {
    let listed = content_id.is_some_and(|id| include.lists_content(id));
    match (include.sitewide, listed) {
        (true, true) => Candidacy::ExcludedForContent,
        (true, false) | (false, true) => Candidacy::Include,
        (false, false) => Candidacy::NotApplicable,
    }
}

/// Resolve `includes` for a page. Pure: the output depends only on the inputs.
///
/// Includes are evaluated in ascending `id` order regardless of input order.
pub fn resolve_includes(
    includes: &[ServiceInclude],
    content_id: Option<ContentId>,
    mode: ExclusionMode,
) -> Vec<ResolvedInclude> {
    let mut candidates: Vec<&ServiceInclude> = includes
        .iter()
        .filter(|include| candidacy(include, content_id) != Candidacy::NotApplicable)
        .collect();
    candidates.sort_by(|a, b| a.id.cmp(&b.id));

    match mode {
        ExclusionMode::PerCandidate => candidates
            .into_iter()
            .filter_map(|include| match candidacy(include, content_id) {
                Candidacy::Include => Some(ResolvedInclude::from(include)),
                Candidacy::ExcludedForContent | Candidacy::NotApplicable => None,
            })
            .collect(),
        ExclusionMode::ShortCircuit => candidates
            .into_iter()
            .take_while(|include| candidacy(include, content_id) != Candidacy::ExcludedForContent)
            .map(ResolvedInclude::from)
            .collect(),
    }
}

/// Group resolved includes per service for front-end loaders.
///
/// Services marked `single_instance` keep only their first include.
pub fn group_page_settings(resolved: Vec<ResolvedInclude>, catalog: &ServiceCatalog) -> PageSettings {
    let mut page = PageSettings::new();
    for include in resolved {
        let single = catalog
            .get_definition(&include.service_name)
            .map(|definition| definition.single_instance)
            .unwrap_or(false);
        let entries = page.entry(include.service_name.clone()).or_default();
        if single && !entries.is_empty() {
            continue;
        }
        entries.push(include);
    }
    page
}

/// Resolves includes from storage for a page
pub struct IncludeResolver {
    repo: Arc<dyn ServiceIncludeRepository>,
    catalog: Arc<ServiceCatalog>,
    mode: ExclusionMode,
}

impl IncludeResolver {
    pub fn new(
        repo: Arc<dyn ServiceIncludeRepository>,
        catalog: Arc<ServiceCatalog>,
        mode: ExclusionMode,
    ) -> Self {
        Self { repo, catalog, mode }
    }

    /// Active includes for `content_id`, in ascending include id order.
    ///
    /// A content id that matches nothing is not an error; sitewide includes
    /// still apply. Includes whose service left the catalog are skipped.
    pub async fn resolve(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<Vec<ResolvedInclude>, SiteServicesError> {
        let candidates = self
            .repo
            .find_candidates(content_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to load service include candidates");
                SiteServicesError::Internal
            })?;

        let resolved: Vec<ResolvedInclude> = resolve_includes(&candidates, content_id, self.mode)
            .into_iter()
            .filter(|include| {
                let known = self.catalog.contains(&include.service_name);
                if !known {
                    tracing::error!(
                        include_id = %include.source_include_id,
                        service = %include.service_name,
                        "Service include references a service missing from the catalog; skipping"
                    );
                }
                known
            })
            .collect();

        tracing::debug!(
            content_id = ?content_id,
            candidates = candidates.len(),
            resolved = resolved.len(),
            "Resolved service includes"
        );
        Ok(resolved)
    }

    /// Resolved includes grouped per service
    pub async fn page_settings(
        &self,
        content_id: Option<ContentId>,
    ) -> Result<PageSettings, SiteServicesError> {
        let resolved = self.resolve(content_id).await?;
        Ok(group_page_settings(resolved, &self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ServiceSettings;
    use chrono::Utc;
    use serde_json::json;

    fn include(id: &str, service: &str, sitewide: bool, content_ids: &[ContentId]) -> ServiceInclude {
        let mut settings = ServiceSettings::new();
        settings.insert("key".to_string(), json!(id));
        ServiceInclude {
            id: id.to_string(),
            label: id.to_uppercase(),
            service_name: service.to_string(),
            service_settings: settings,
            sitewide,
            content_ids: content_ids.to_vec(),
            content_editing_enabled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ids(resolved: &[ResolvedInclude]) -> Vec<&str> {
        resolved.iter().map(|r| r.source_include_id.as_str()).collect()
    }

    #[test]
    fn test_candidacy() {
        let sitewide = include("a", "livechat", true, &[5]);
        assert_eq!(candidacy(&sitewide, None), Candidacy::Include);
        assert_eq!(candidacy(&sitewide, Some(1)), Candidacy::Include);
        assert_eq!(candidacy(&sitewide, Some(5)), Candidacy::ExcludedForContent);

        let specific = include("b", "statuspage", false, &[5]);
        assert_eq!(candidacy(&specific, None), Candidacy::NotApplicable);
        assert_eq!(candidacy(&specific, Some(1)), Candidacy::NotApplicable);
        assert_eq!(candidacy(&specific, Some(5)), Candidacy::Include);
    }

    #[test]
    fn test_sitewide_and_specific_scenario() {
        let includes = vec![
            include("b", "statuspage", false, &[42]),
            include("a", "livechat", true, &[]),
        ];
        let mode = ExclusionMode::PerCandidate;
        assert_eq!(ids(&resolve_includes(&includes, Some(42), mode)), vec!["a", "b"]);
        assert_eq!(ids(&resolve_includes(&includes, Some(7), mode)), vec!["a"]);
        assert_eq!(ids(&resolve_includes(&includes, None, mode)), vec!["a"]);
    }

    #[test]
    fn test_sitewide_exclusion() {
        let includes = vec![include("a", "livechat", true, &[10])];
        let mode = ExclusionMode::PerCandidate;
        assert!(resolve_includes(&includes, Some(10), mode).is_empty());
        assert_eq!(ids(&resolve_includes(&includes, Some(11), mode)), vec!["a"]);
        assert_eq!(ids(&resolve_includes(&includes, None, mode)), vec!["a"]);
    }

    #[test]
    fn test_exclusion_does_not_stop_later_candidates() {
        let includes = vec![
            include("a_chat", "livechat", true, &[10]),
            include("b_status", "statuspage", true, &[]),
            include("c_bot", "goodkind", false, &[10]),
        ];
        let resolved = resolve_includes(&includes, Some(10), ExclusionMode::PerCandidate);
        assert_eq!(ids(&resolved), vec!["b_status", "c_bot"]);
    }

    #[test]
    fn test_short_circuit_mode_stops_at_first_exclusion() {
        let includes = vec![
            include("a_status", "statuspage", true, &[]),
            include("b_chat", "livechat", true, &[10]),
            include("c_bot", "goodkind", false, &[10]),
        ];
        let resolved = resolve_includes(&includes, Some(10), ExclusionMode::ShortCircuit);
        assert_eq!(ids(&resolved), vec!["a_status"]);

        let resolved = resolve_includes(&includes, Some(11), ExclusionMode::ShortCircuit);
        assert_eq!(ids(&resolved), vec!["a_status", "b_chat"]);
    }

    #[test]
    fn test_resolution_is_idempotent_and_carries_settings() {
        let includes = vec![
            include("z", "statuspage", false, &[3]),
            include("m", "livechat", true, &[]),
        ];
        let first = resolve_includes(&includes, Some(3), ExclusionMode::PerCandidate);
        let second = resolve_includes(&includes, Some(3), ExclusionMode::PerCandidate);
        assert_eq!(first, second);
        assert_eq!(first[0].service_settings.get("key"), Some(&json!("m")));
        assert_eq!(first[0].label, "M");
    }

    #[test]
    fn test_group_page_settings_single_instance() {
        let catalog = ServiceCatalog::builtin().unwrap();
        let includes = vec![
            include("chat_a", "livechat", true, &[]),
            include("chat_b", "livechat", true, &[]),
            include("status_a", "statuspage", true, &[]),
            include("status_b", "statuspage", true, &[]),
        ];
        let resolved = resolve_includes(&includes, None, ExclusionMode::PerCandidate);
        let page = group_page_settings(resolved, &catalog);

        assert_eq!(ids(&page["livechat"]), vec!["chat_a"]);
        assert_eq!(ids(&page["statuspage"]), vec!["status_a", "status_b"]);
    }
}
