//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Service include table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "service_includes")]
pub struct Model {
    /// Machine name (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub label: String,

    /// Catalog service name
    pub service_name: String,

    /// Normalized settings as a JSON object
    pub service_settings: Json,

    pub sitewide: bool,

    pub content_editing_enabled: bool,

    /// Creation timestamp
    pub created_at: DateTimeUtc,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Listed content items
    #[sea_orm(has_many = "include_content::Entity")]
    IncludeContent,
}

impl Related<include_content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncludeContent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Content items listed by an include
pub mod include_content {
    use sea_orm::entity::prelude::*;

    /// One listed content item; `position` keeps the admin's ordering
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "service_include_content")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub include_id: String,

        #[sea_orm(primary_key, auto_increment = false)]
        pub content_id: i64,

        pub position: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::IncludeId",
            to = "super::Column::Id",
            on_delete = "Cascade"
        )]
        ServiceInclude,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ServiceInclude.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
