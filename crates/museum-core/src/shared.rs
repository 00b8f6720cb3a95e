//! Configuration shared by the museum host and its tooling.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Port used when neither the config file nor `PORT` supplies one.
pub const DEFAULT_PORT: u16 = 8000;

/// Directory holding the site (index document, `css/`, `js/`, `modules/*`).
pub const DEFAULT_CONTENT_ROOT: &str = "细胞里的靖边数字博物馆";

/// Static host configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseumConfig {
    /// Name printed in logs and returned by the status endpoint.
    pub app_name: String,
    /// HTTP port.
    pub port: u16,
    /// Interface to bind; all interfaces by default.
    pub bind_address: String,
    /// Directory served as the site root.
    pub content_root: String,
    /// File under `content_root` answered for `GET /`.
    #[serde(default = "default_index_document")]
    pub index_document: String,
}

fn default_index_document() -> String {
    "index.html".to_string()
}

impl MuseumConfig {
    pub fn content_root_path(&self) -> PathBuf {
        PathBuf::from(&self.content_root)
    }

    pub fn index_path(&self) -> PathBuf {
        self.content_root_path().join(&self.index_document)
    }

    /// `bind_address:port` as a socket address string.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Load config from file and environment.
    /// Precedence: `PORT` > `MUSEUM__*` env > file (`MUSEUM_CONFIG` path, else `config/museum.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("MUSEUM_CONFIG").unwrap_or_else(|_| "config/museum.toml".to_string());
        let port_override = std::env::var("PORT").ok();
        Self::load_from(Path::new(&config_path), port_override.as_deref())
    }

    /// Same as [`MuseumConfig::load`] with the file path and `PORT` value passed explicitly.
    pub fn load_from(path: &Path, port_override: Option<&str>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "细胞里的靖边数字博物馆")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bind_address", "0.0.0.0")?
            .set_default("content_root", DEFAULT_CONTENT_ROOT)?
            .set_default("index_document", "index.html")?;

        let file_present = path.exists();
        tracing::debug!(
            target: "museum::config",
            path = %path.display(),
            file_present,
            "Loading museum configuration"
        );
        let builder = if file_present {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let mut builder =
            builder.add_source(config::Environment::with_prefix("MUSEUM").separator("__"));

        if let Some(raw) = port_override.map(str::trim).filter(|s| !s.is_empty()) {
            let port: u16 = raw
                .parse()
                .map_err(|_| config::ConfigError::Message(format!("PORT is not a valid port: {raw}")))?;
            builder = builder.set_override("port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }
}
