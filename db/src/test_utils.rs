use migration::Migrator;
use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh, fully migrated in-memory SQLite database. Each call is isolated.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Migrated SQLite file at `path` behind a pool of `max_connections`, so
/// concurrent statements really run on separate connections.
pub async fn setup_pooled_test_db(path: &Path, max_connections: u32) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(max_connections).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to file db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
