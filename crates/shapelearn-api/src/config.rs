//! Server configuration.
//!
//! Loaded from `shapelearn.json` with serde defaults for every missing
//! field, then validated. CLI flags may override individual values.

use std::path::Path;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "shapelearn.json";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

/// Vite dev server and the alternative dev port.
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

const fn default_max_practice_count() -> usize {
    100
}

/// Configuration for the ShapeLearn HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Deployed frontend origin, appended to `cors_origins`.
    #[serde(default)]
    pub frontend_url: Option<String>,

    /// Seed for practice problem sampling. Entropy-seeded when absent.
    #[serde(default)]
    pub practice_seed: Option<u64>,

    /// Largest `count` a practice request may ask for.
    #[serde(default = "default_max_practice_count")]
    pub max_practice_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            frontend_url: None,
            practice_seed: None,
            max_practice_count: default_max_practice_count(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ServerError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `shapelearn.json` from `dir`, or defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigParseError` for unreadable files or invalid
    /// JSON, and `ServerError::ConfigValidationError` for out-of-range values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ServerError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ServerError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ServerError::config_validation(
                "host must not be empty",
                "Set host to an interface such as \"0.0.0.0\" or \"127.0.0.1\" in your shapelearn.json",
            ));
        }

        if self.port == 0 {
            return Err(ServerError::config_validation(
                "port must be greater than 0",
                "Set port to a free TCP port (default 5000) in your shapelearn.json",
            ));
        }

        if self.max_practice_count == 0 {
            return Err(ServerError::config_validation(
                "maxPracticeCount must be greater than 0",
                "Set maxPracticeCount to at least 1 in your shapelearn.json",
            ));
        }

        for origin in self.allowed_origins() {
            if origin.trim().is_empty() || HeaderValue::from_str(&origin).is_err() {
                return Err(ServerError::config_validation(
                    format!("invalid CORS origin '{origin}'"),
                    "Use full origins such as \"http://localhost:5173\" in corsOrigins and frontendUrl",
                ));
            }
        }

        Ok(())
    }

    /// CORS allow-list: `cors_origins` plus `frontend_url`, without duplicates.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = self.cors_origins.clone();
        if let Some(url) = &self.frontend_url {
            if !origins.contains(url) {
                origins.push(url.clone());
            }
        }
        origins
    }
}
