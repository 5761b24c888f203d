use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Title used when a session is opened without one.
pub const DEFAULT_TITLE: &str = "Attendance";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub module_id: i64,
    pub created_by: i64,
    pub title: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly when `status` is `Closed`.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a session. `Active -> Closed` is the only transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::module::Entity",
        from = "Column::ModuleId",
        to = "super::module::Column::Id",
        on_delete = "Cascade"
    )]
    Module,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new ACTIVE session. A blank or missing title becomes [`DEFAULT_TITLE`].
    pub async fn create<C>(
        db: &C,
        module_id: i64,
        created_by: i64,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        ActiveModel {
            module_id: Set(module_id),
            created_by: Set(created_by),
            title: Set(title.to_owned()),
            status: Set(SessionStatus::Active),
            created_at: Set(now),
            closed_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub async fn get_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    /// Flips an ACTIVE session to CLOSED in one conditional update.
    ///
    /// Returns `false` when no row changed, i.e. the session was already closed
    /// (or does not exist). `closed_at` is never rewritten.
    pub async fn close<C>(db: &C, id: i64, closed_at: DateTime<Utc>) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(SessionStatus::Closed))
            .col_expr(Column::ClosedAt, Expr::value(closed_at))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SessionStatus::Active))
            .exec(db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    /// Sessions of a module, newest first. `status = None` returns every status.
    pub async fn for_module<C>(
        db: &C,
        module_id: i64,
        status: Option<SessionStatus>,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut sel = Entity::find().filter(Column::ModuleId.eq(module_id));
        if let Some(status) = status {
            sel = sel.filter(Column::Status.eq(status));
        }

        sel.order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
