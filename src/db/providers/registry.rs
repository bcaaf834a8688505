use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::DatabaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

/// One backend the `todos` table can live in, picked by url scheme.
#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;

    /// Lowercase url prefixes this provider accepts.
    fn schemes(&self) -> &'static [&'static str];

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        self.schemes()
            .iter()
            .any(|scheme| normalized.starts_with(scheme))
    }

    /// `(max, min)` pool size for this url.
    fn pool_bounds(&self, cfg: &DatabaseConfig) -> (u32, u32) {
        (cfg.max_connections, cfg.min_idle.min(cfg.max_connections))
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let (max_connections, min_connections) = self.pool_bounds(cfg);
        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(cfg.connect_timeout())
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        Ok(db)
    }

    async fn post_connect(&self, _db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        Ok(())
    }
}

/// Registered providers in registration order. The first match wins.
#[derive(Default)]
pub struct DbProviders {
    providers: Vec<Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.iter().any(|existing| existing.id() == id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.push(provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}'; expected one of: {}",
                    redact_url(url),
                    self.known_schemes()
                )
            })
    }

    /// Resolves the provider for `cfg.url`, opens the pool and runs the
    /// provider's connection setup.
    pub async fn connect(
        &self,
        cfg: &DatabaseConfig,
    ) -> Result<(DbProviderId, DatabaseConnection)> {
        let provider = self.provider_for_url(&cfg.url)?;
        let id = provider.id();

        let db = provider.connect(cfg).await.with_context(|| {
            format!("failed to connect to {} at {}", id.as_str(), redact_url(&cfg.url))
        })?;
        provider
            .post_connect(&db, cfg)
            .await
            .with_context(|| format!("failed to prepare {} connection", id.as_str()))?;
        Ok((id, db))
    }

    fn known_schemes(&self) -> String {
        let schemes: Vec<&str> = self
            .providers
            .iter()
            .flat_map(|provider| provider.schemes().iter().copied())
            .collect();
        if schemes.is_empty() {
            return "<none registered>".to_string();
        }
        schemes.join(", ")
    }
}

/// Keeps only the scheme so credentials never reach logs or errors.
fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}
