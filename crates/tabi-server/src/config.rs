//! Configuration file management for tabi.
//!
//! Provides a TOML-based config file at `~/.config/tabi/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default. Secrets
//! (`GEMINI_API_KEY`, `BLOB_READ_WRITE_TOKEN`) are usually supplied via the
//! environment; the file exists so local setups can avoid exporting them in
//! every shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tabi_blob::BlobConfig;
use tabi_core::provider::GeminiClient;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub blob: BlobSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub structured_output: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BlobSection {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub prefix: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the tabi config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/tabi` or `~/.config/tabi`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tabi");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tabi")
}

/// Return the path to the tabi config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct TabiConfig {
    pub bind: String,
    pub port: u16,
    /// `None` when no key is configured anywhere; AI-dependent actions then
    /// short-circuit with a server-configuration error.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub structured_output: bool,
    pub blob: BlobConfig,
}

impl TabiConfig {
    pub const DEFAULT_BIND: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8787;

    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    pub fn resolve(cli_bind: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let file = load_config().unwrap_or_default();

        let bind = if let Some(b) = cli_bind {
            b.to_string()
        } else if let Ok(b) = std::env::var("TABI_BIND") {
            b
        } else {
            file.server
                .bind
                .unwrap_or_else(|| Self::DEFAULT_BIND.to_string())
        };

        let port = if let Some(p) = cli_port {
            p
        } else if let Ok(p) = std::env::var("TABI_PORT") {
            p.parse().context("TABI_PORT is not a valid port number")?
        } else {
            file.server.port.unwrap_or(Self::DEFAULT_PORT)
        };

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or(file.gemini.api_key);

        let gemini_model = std::env::var("TABI_GEMINI_MODEL")
            .ok()
            .or(file.gemini.model)
            .unwrap_or_else(|| GeminiClient::DEFAULT_MODEL.to_string());

        let structured_output = match std::env::var("TABI_STRUCTURED_OUTPUT") {
            Ok(v) => matches!(v.as_str(), "1" | "true" | "yes"),
            Err(_) => file.gemini.structured_output.unwrap_or(false),
        };

        let blob = BlobConfig::new(
            std::env::var("TABI_BLOB_BASE_URL")
                .ok()
                .or(file.blob.base_url)
                .unwrap_or_else(|| BlobConfig::DEFAULT_BASE_URL.to_string()),
            std::env::var("BLOB_READ_WRITE_TOKEN")
                .ok()
                .or(file.blob.token),
            std::env::var("TABI_BLOB_PREFIX")
                .ok()
                .or(file.blob.prefix)
                .unwrap_or_else(|| BlobConfig::DEFAULT_PREFIX.to_string()),
        );

        Ok(Self {
            bind,
            port,
            gemini_api_key,
            gemini_model,
            structured_output,
            blob,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
