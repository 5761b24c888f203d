use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The central table for user-module-role relationships.
/// A user holds at most one role per module.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_module_roles")]
pub struct Model {
    /// User ID (foreign key to `users`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// Module ID (foreign key to `modules`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub module_id: i64,

    pub role: Role,
}

/// Enum representing user roles within a module.
/// Backed by a `user_module_role_type` enum in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_module_role_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "lecturer")]
    Lecturer,

    #[sea_orm(string_value = "assistant_lecturer")]
    AssistantLecturer,

    #[sea_orm(string_value = "tutor")]
    Tutor,

    #[sea_orm(string_value = "student")]
    Student,
}

impl Role {
    /// Lecturers and assistant lecturers run attendance for their module.
    pub fn is_instructor(self) -> bool {
        matches!(self, Role::Lecturer | Role::AssistantLecturer)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::module::Entity",
        from = "Column::ModuleId",
        to = "super::module::Column::Id",
        on_delete = "Cascade"
    )]
    Module,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn assign_user_to_module<C>(
        db: &C,
        user_id: i64,
        module_id: i64,
        role: Role,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            user_id: Set(user_id),
            module_id: Set(module_id),
            role: Set(role),
        }
        .insert(db)
        .await
    }

    /// The role `user_id` holds on `module_id`, if any.
    pub async fn role_of<C>(db: &C, user_id: i64, module_id: i64) -> Result<Option<Role>, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Entity::find_by_id((user_id, module_id))
            .one(db)
            .await?
            .map(|m| m.role))
    }

    /// Enrolled students of a module joined with their user rows,
    /// ordered by username then id.
    pub async fn students_for_module<C>(
        db: &C,
        module_id: i64,
    ) -> Result<Vec<super::user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        use super::user::{Column as UserCol, Entity as UserEntity};

        let student_ids = Entity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::ModuleId.eq(module_id))
            .filter(Column::Role.eq(Role::Student))
            .into_query();

        UserEntity::find()
            .filter(UserCol::Id.in_subquery(student_ids))
            .order_by_asc(UserCol::Username)
            .order_by_asc(UserCol::Id)
            .all(db)
            .await
    }
}
