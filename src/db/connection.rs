use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::default_registry;
use crate::config::DatabaseConfig;

/// Opens the configured store and creates the `todos` table when missing.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let (provider, db) = default_registry()?.connect(cfg).await?;

    info!(
        provider = provider.as_str(),
        "syncing database schema from entities"
    );
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}
