use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;

/// Represents a university module in the `modules` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Module code, e.g. "COS301".
    pub code: String,
    pub year: i32,
    pub description: Option<String>,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_module_role::Entity")]
    UserModuleRoles,
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    AttendanceSessions,
}

impl Related<super::user_module_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserModuleRoles.def()
    }
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        code: &str,
        year: i32,
        description: Option<&str>,
        credits: i32,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let module = ActiveModel {
            code: Set(code.to_owned()),
            year: Set(year),
            description: Set(description.map(|d| d.to_owned())),
            credits: Set(credits),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        module.insert(db).await
    }

    pub async fn get_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }
}
