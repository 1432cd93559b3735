#![cfg(test)]
use std::time::Duration;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::{connect_with_config, DatabaseConfig};

// Migrations run once per test process; `false` means the database is unusable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout = Duration::from_secs(3);
    cfg.acquire_timeout = Duration::from_secs(5);
    cfg
}

/// A migrated connection for the current test's runtime, or `None` when
/// `SKIP_DB_TESTS` is set or Postgres is unreachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&test_config()).await {
                Ok(db) => match migration::Migrator::up(&db, None).await {
                    Ok(()) => true,
                    Err(e) => {
                        eprintln!("skip: migrate up failed: {}", e);
                        false
                    }
                },
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }
    connect_with_config(&test_config()).await.ok()
}
