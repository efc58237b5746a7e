//! Config Command
//!
//! Usage:
//!   coderefine config show [-f json|toml]
//!   coderefine config path
//!   coderefine config init [--force]

use std::path::Path;

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{RefineError, Result};

/// Show the merged effective configuration
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    match format {
        "json" => ConfigLoader::show_config(config_path, true),
        "toml" | "text" => ConfigLoader::show_config(config_path, false),
        other => Err(RefineError::Config(format!(
            "Unknown format '{}'. Valid values: toml, json",
            other
        ))),
    }
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write the default global config file
pub fn init(force: bool) -> Result<()> {
    let config_path = ConfigLoader::init_global(force)?;
    let output = Output::new();
    output.success("Initialized global configuration");
    output.field("Config", &config_path.display().to_string());
    output.info("Set OPENAI_API_KEY (or CODEREFINE_LLM__API_KEY) before running 'coderefine serve'");
    Ok(())
}
