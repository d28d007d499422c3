//! SeaORM repository implementations

use crate::contract::{ContentId, ServiceInclude};
use crate::domain::repository::ServiceIncludeRepository;
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    sea_query::Query, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use std::sync::Arc;

use super::entity::{self, include_content};
use super::mapper::content_rows;

// ===== Service Include Repository =====

pub struct SeaOrmServiceIncludeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmServiceIncludeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn load(&self, condition: Condition) -> Result<Vec<ServiceInclude>> {
        let results = entity::Entity::find()
            .filter(condition)
            .order_by_asc(entity::Column::Id)
            .find_with_related(include_content::Entity)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(ServiceInclude::try_from)
            .collect::<Result<Vec<_>>>()
    }

    /// Replace the stored content list of an include and read it back
    async fn replace_content(
        txn: &DatabaseTransaction,
        include: &ServiceInclude,
    ) -> Result<Vec<include_content::Model>> {
        include_content::Entity::delete_many()
            .filter(include_content::Column::IncludeId.eq(&include.id))
            .exec(txn)
            .await?;

        let rows = content_rows(include);
        if !rows.is_empty() {
            include_content::Entity::insert_many(rows).exec(txn).await?;
        }

        let content = include_content::Entity::find()
            .filter(include_content::Column::IncludeId.eq(&include.id))
            .all(txn)
            .await?;

        Ok(content)
    }
}

#[async_trait]
impl ServiceIncludeRepository for SeaOrmServiceIncludeRepository {
    async fn insert(&self, include: &ServiceInclude) -> Result<Option<ServiceInclude>> {
        let txn = self.db.begin().await?;

        let active: entity::ActiveModel = include.try_into()?;
        let saved = match entity::Entity::insert(active).exec_with_returning(&txn).await {
            Ok(saved) => saved,
            // Dropping the transaction rolls it back
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let content = Self::replace_content(&txn, include).await?;
        txn.commit().await?;

        Ok(Some((saved, content).try_into()?))
    }

    async fn upsert(&self, include: &ServiceInclude) -> Result<ServiceInclude> {
        let txn = self.db.begin().await?;

        let existing = entity::Entity::find_by_id(include.id.clone())
            .one(&txn)
            .await?;

        let active: entity::ActiveModel = include.try_into()?;
        let saved = if existing.is_some() {
            entity::Entity::update(active).exec(&txn).await?
        } else {
            entity::Entity::insert(active)
                .exec_with_returning(&txn)
                .await?
        };

        let content = Self::replace_content(&txn, include).await?;
        txn.commit().await?;

        (saved, content).try_into()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceInclude>> {
        let result = entity::Entity::find_by_id(id)
            .find_with_related(include_content::Entity)
            .all(&*self.db)
            .await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(row.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<ServiceInclude>> {
        self.load(Condition::all()).await
    }

    async fn find_candidates(&self, content_id: Option<ContentId>) -> Result<Vec<ServiceInclude>> {
        let mut condition = Condition::any().add(entity::Column::Sitewide.eq(true));

        if let Some(cid) = content_id {
            condition = condition.add(
                entity::Column::Id.in_subquery(
                    Query::select()
                        .column(include_content::Column::IncludeId)
                        .from(include_content::Entity)
                        .and_where(include_content::Column::ContentId.eq(cid))
                        .to_owned(),
                ),
            );
        }

        self.load(condition).await
    }

    async fn find_specific(&self, content_editing_only: bool) -> Result<Vec<ServiceInclude>> {
        let mut condition = Condition::all().add(entity::Column::Sitewide.eq(false));
        if content_editing_only {
            condition = condition.add(entity::Column::ContentEditingEnabled.eq(true));
        }

        self.load(condition).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let txn = self.db.begin().await?;

        include_content::Entity::delete_many()
            .filter(include_content::Column::IncludeId.eq(id))
            .exec(&txn)
            .await?;

        let result = entity::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
