use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Names an optional config file (toml, yaml or json by extension) that is
/// read before the environment. Environment variables override its values.
pub const CONFIG_FILE_VAR: &str = "TODO_API_CONFIG";

pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        load_dotenv();
        let file = std::env::var_os(CONFIG_FILE_VAR).map(PathBuf::from);
        Self::load(file.as_deref(), None)
    }

    /// Builds the config from an explicit variable map instead of the process
    /// environment. Keys use the same `APP_SECTION__FIELD` shape.
    fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(None, Some(vars.into_iter().collect()))
    }

    fn load(file: Option<&Path>, vars: Option<config_rs::Map<String, String>>) -> Result<Self> {
        let mut builder = config_rs::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config_rs::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .with_context(|| match file {
                Some(path) => format!("failed to read config from {}", path.display()),
                None => "failed to read environment variables for config".to_string(),
            })?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}

fn load_dotenv() {
    // .env next to the manifest wins over one in the working directory
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}
