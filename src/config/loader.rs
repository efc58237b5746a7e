//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/coderefine/config.toml)
//! 3. Project config (./coderefine.toml)
//! 4. Environment variables (CODEREFINE_* prefix, `__` separates sections)
//!
//! `OPENAI_API_KEY` is honoured when no key was configured elsewhere.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{RefineError, Result};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CODEREFINE_";

/// Conventional provider credential variable
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// With an explicit `path`: defaults → that file → env vars.
    /// Without one: defaults → global → project → env vars.
    pub fn resolve(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = path {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else {
            if let Some(global_path) = Self::global_config_path()
                && global_path.exists()
            {
                debug!("Loading global config from: {}", global_path.display());
                figment = figment.merge(Toml::file(&global_path));
            }

            let project_path = Self::project_config_path();
            if project_path.exists() {
                debug!("Loading project config from: {}", project_path.display());
                figment = figment.merge(Toml::file(&project_path));
            }
        }

        // e.g. CODEREFINE_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let mut config: Config = figment
            .extract()
            .map_err(|e| RefineError::Config(format!("Configuration error: {}", e)))?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/coderefine/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("coderefine"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("coderefine.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show the effective configuration for `path` (or the default chain)
    pub fn show_config(path: Option<&Path>, as_json: bool) -> Result<()> {
        let config = Self::resolve(path)?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| RefineError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            RefineError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_global_config())?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default global config content (TOML)
    fn default_global_config() -> String {
        r#"# coderefine Global Configuration
# Project settings in ./coderefine.toml and CODEREFINE_* variables override these.

[server]
host = "0.0.0.0"
port = 5000
allowed_origins = ["http://localhost:3000"]
rate_limit_per_minute = 100
diagnostics = false

# Completion provider (OpenAI-compatible).
# The API key is read from OPENAI_API_KEY or CODEREFINE_LLM__API_KEY.
[llm]
api_base = "https://api.openai.com/v1"
model = "gpt-4"
timeout_secs = 30
temperature = 0.3
max_tokens = 4000

[limits]
max_file_bytes = 5242880
max_archive_bytes = 52428800
"#
        .to_string()
    }
}
