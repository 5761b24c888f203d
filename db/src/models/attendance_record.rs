use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{QueryFilter, QueryOrder};
use serde::Serialize;

use super::attendance_session::{self, SessionStatus};

/// Proof that `user_id` marked presence in `session_id`. Never updated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub taken_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts `(session_id, user_id, taken_at)` only while the session is ACTIVE,
    /// as a single statement:
    ///
    /// ```sql
    /// INSERT INTO attendance_records (session_id, user_id, taken_at)
    /// SELECT ?, ?, ? WHERE EXISTS (SELECT 1 FROM attendance_sessions WHERE id = ? AND status = 'active')
    /// ON CONFLICT (session_id, user_id) DO NOTHING
    /// ```
    ///
    /// Returns `true` if a row was written. `false` means either a record already
    /// exists for the pair or the session is not active; callers tell the two apart
    /// with [`Model::find_for`].
    pub async fn insert_if_active<C>(
        db: &C,
        session_id: i64,
        user_id: i64,
        taken_at: DateTime<Utc>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_session = Query::select()
            .expr(Expr::val(1))
            .from(attendance_session::Entity)
            .and_where(Expr::col(attendance_session::Column::Id).eq(session_id))
            .and_where(Expr::col(attendance_session::Column::Status).eq(SessionStatus::Active))
            .to_owned();

        let source = Query::select()
            .exprs([Expr::val(session_id), Expr::val(user_id), Expr::val(taken_at)])
            .and_where(Expr::exists(active_session))
            .to_owned();

        let insert = Query::insert()
            .into_table(Entity)
            .columns([Column::SessionId, Column::UserId, Column::TakenAt])
            .select_from(source)
            .map_err(|e| DbErr::Custom(format!("Invalid attendance insert: {e}")))?
            .on_conflict(
                OnConflict::columns([Column::SessionId, Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let res = db.execute(db.get_database_backend().build(&insert)).await?;
        Ok(res.rows_affected() == 1)
    }

    pub async fn find_for<C>(db: &C, session_id: i64, user_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id((session_id, user_id)).one(db).await
    }

    /// All records of a session in marking order.
    pub async fn for_session<C>(db: &C, session_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::TakenAt)
            .order_by_asc(Column::UserId)
            .all(db)
            .await
    }
}
