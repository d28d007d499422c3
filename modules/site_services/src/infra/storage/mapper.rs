//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{ServiceInclude, ServiceSettings};

// ===== Service Include Conversions =====

impl TryFrom<(entity::Model, Vec<entity::include_content::Model>)> for ServiceInclude {
    type Error = anyhow::Error;

    fn try_from(
        (entity, mut content): (entity::Model, Vec<entity::include_content::Model>),
    ) -> Result<Self, Self::Error> {
        let service_settings: ServiceSettings = serde_json::from_value(entity.service_settings)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Stored settings of service include '{}' are not a JSON object: {}",
                    entity.id,
                    e
                )
            })?;
        content.sort_by_key(|row| row.position);

        Ok(Self {
            id: entity.id,
            label: entity.label,
            service_name: entity.service_name,
            service_settings,
            sitewide: entity.sitewide,
            content_ids: content.into_iter().map(|row| row.content_id).collect(),
            content_editing_enabled: entity.content_editing_enabled,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&ServiceInclude> for entity::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &ServiceInclude) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        Ok(Self {
            id: Set(model.id.clone()),
            label: Set(model.label.clone()),
            service_name: Set(model.service_name.clone()),
            service_settings: Set(serde_json::to_value(&model.service_settings)?),
            sitewide: Set(model.sitewide),
            content_editing_enabled: Set(model.content_editing_enabled),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

/// Rows for the include's content list, positions following list order
pub fn content_rows(include: &ServiceInclude) -> Vec<entity::include_content::ActiveModel> {
    use sea_orm::ActiveValue::Set;

    include
        .content_ids
        .iter()
        .enumerate()
        .map(|(position, content_id)| entity::include_content::ActiveModel {
            include_id: Set(include.id.clone()),
            content_id: Set(*content_id),
            position: Set(position as i32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_content_rows_follow_list_order() {
        let now = Utc::now();
        let include = entity::Model {
            id: "status_main".to_string(),
            label: "Status".to_string(),
            service_name: "statuspage".to_string(),
            service_settings: json!({"page_id": "abcdefghijkl"}),
            sitewide: false,
            content_editing_enabled: false,
            created_at: now,
            updated_at: now,
        };
        let content = vec![
            entity::include_content::Model {
                include_id: "status_main".to_string(),
                content_id: 9,
                position: 1,
            },
            entity::include_content::Model {
                include_id: "status_main".to_string(),
                content_id: 4,
                position: 0,
            },
        ];

        let model = ServiceInclude::try_from((include, content)).unwrap();
        assert_eq!(model.content_ids, vec![4, 9]);
        assert_eq!(model.service_settings["page_id"], json!("abcdefghijkl"));

        let rows = content_rows(&model);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].content_id.clone().unwrap(), 4);
        assert_eq!(rows[1].position.clone().unwrap(), 1);
    }

    #[test]
    fn test_non_object_settings_rejected() {
        let now = Utc::now();
        let include = entity::Model {
            id: "broken".to_string(),
            label: "Broken".to_string(),
            service_name: "livechat".to_string(),
            service_settings: json!([1, 2]),
            sitewide: true,
            content_editing_enabled: false,
            created_at: now,
            updated_at: now,
        };
        assert!(ServiceInclude::try_from((include, Vec::new())).is_err());
    }
}
