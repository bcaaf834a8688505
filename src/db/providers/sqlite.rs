use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use super::registry::{DbProvider, DbProviderId};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteDbProvider;

/// Each connection to an in-memory database opens its own empty database.
fn is_memory_url(url: &str) -> bool {
    let normalized = url.trim().to_ascii_lowercase();
    normalized.contains(":memory:") || normalized.contains("mode=memory")
}

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn schemes(&self) -> &'static [&'static str] {
        &["sqlite:"]
    }

    fn pool_bounds(&self, cfg: &DatabaseConfig) -> (u32, u32) {
        if is_memory_url(&cfg.url) {
            return (1, 1);
        }
        (cfg.max_connections, cfg.min_idle.min(cfg.max_connections))
    }

    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SqliteDbProvider, is_memory_url};
    use crate::config::DatabaseConfig;
    use crate::db::providers::DbProvider;

    fn cfg(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 10,
            min_idle: 2,
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn detects_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:todos?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://todos.db?mode=rwc"));
    }

    #[test]
    fn memory_databases_use_a_single_connection() {
        let provider = SqliteDbProvider;

        assert_eq!(provider.pool_bounds(&cfg("sqlite::memory:")), (1, 1));
        assert_eq!(provider.pool_bounds(&cfg("sqlite://todos.db")), (10, 2));
    }
}
