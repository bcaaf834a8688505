mod postgres;
mod registry;
mod sqlite;

use std::sync::Arc;

pub use registry::{DbProvider, DbProviderId, DbProviders};

use self::{postgres::PostgresDbProvider, sqlite::SqliteDbProvider};

/// Postgres and SQLite, the two backends the service ships with.
pub fn default_registry() -> anyhow::Result<DbProviders> {
    let mut providers = DbProviders::new();
    providers.add(Arc::new(PostgresDbProvider))?;
    providers.add(Arc::new(SqliteDbProvider))?;
    Ok(providers)
}
