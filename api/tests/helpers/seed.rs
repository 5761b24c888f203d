use api::auth::generate_jwt;
use chrono::{Datelike, Utc};
use db::models::{
    module::Model as ModuleModel,
    user::Model as UserModel,
    user_module_role::{Model as UserModuleRoleModel, Role},
};
use sea_orm::DatabaseConnection;

pub struct TestUser {
    pub user: UserModel,
    pub token: String,
}

pub struct TestCtx {
    pub module: ModuleModel,
    pub lecturer: TestUser,
    pub tutor: TestUser,
    pub students: Vec<TestUser>,
    pub outsider: TestUser,
    pub admin: TestUser,
}

async fn user(db: &DatabaseConnection, username: &str, admin: bool) -> TestUser {
    let user = UserModel::create(db, username, &format!("{username}@test.com"), "password", admin)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, user.admin);
    TestUser { user, token }
}

async fn member(db: &DatabaseConnection, username: &str, module_id: i64, role: Role) -> TestUser {
    let u = user(db, username, false).await;
    UserModuleRoleModel::assign_user_to_module(db, u.user.id, module_id, role)
        .await
        .unwrap();
    u
}

/// Module ATT301 with a lecturer, a tutor, students ann, bo and cy,
/// a user with no role and a global admin.
pub async fn setup(db: &DatabaseConnection) -> TestCtx {
    let module = ModuleModel::create(db, "ATT301", Utc::now().year(), Some("Attendance Tests"), 16)
        .await
        .unwrap();

    let lecturer = member(db, "att_lect", module.id, Role::Lecturer).await;
    let tutor = member(db, "att_tutor", module.id, Role::Tutor).await;
    let mut students = Vec::new();
    for name in ["ann", "bo", "cy"] {
        students.push(member(db, name, module.id, Role::Student).await);
    }

    TestCtx {
        module,
        lecturer,
        tutor,
        students,
        outsider: user(db, "att_outsider", false).await,
        admin: user(db, "att_admin", true).await,
    }
}
