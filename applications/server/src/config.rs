/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_exports")]
    pub exports: ExportSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL clients use to reach this server; cover URLs are built from it
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Served under `/upload`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub access_token_key: String,

    #[serde(default)]
    pub refresh_token_key: String,

    #[serde(default = "default_access_token_age_secs")]
    pub access_token_age_secs: u64,

    #[serde(default = "default_refresh_token_age_days")]
    pub refresh_token_age_days: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    /// Load configuration from `path` (or `./config.toml` if present) and the
    /// environment.
    ///
    /// Environment variables use the `OPENMUSIC_` prefix and `__` between
    /// nested keys, e.g. `OPENMUSIC_AUTH__ACCESS_TOKEN_KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("OPENMUSIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token_key.is_empty() {
            return Err(ServerError::config(
                "access token key is required (set OPENMUSIC_AUTH__ACCESS_TOKEN_KEY)",
            ));
        }

        if self.auth.refresh_token_key.is_empty() {
            return Err(ServerError::config(
                "refresh token key is required (set OPENMUSIC_AUTH__REFRESH_TOKEN_KEY)",
            ));
        }

        if self.exports.enabled && self.exports.workers == 0 {
            return Err(ServerError::config(
                "exports.workers must be at least 1 when exports are enabled",
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        public_url: default_public_url(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        upload_dir: default_upload_dir(),
        export_dir: default_export_dir(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/openmusic.db".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./data/upload")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./data/exports")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        access_token_key: String::new(),
        refresh_token_key: String::new(),
        access_token_age_secs: default_access_token_age_secs(),
        refresh_token_age_days: default_refresh_token_age_days(),
    }
}

fn default_access_token_age_secs() -> u64 {
    1800
}

fn default_refresh_token_age_days() -> u64 {
    30
}

fn default_exports() -> ExportSettings {
    ExportSettings {
        enabled: default_enabled(),
        workers: default_workers(),
    }
}

fn default_enabled() -> bool {
    true
}

fn default_workers() -> usize {
    1
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            exports: default_exports(),
        }
    }
}
