//! Config command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tandem_core::config::{default_config_path, resolve_config_path};
use tandem_core::EngineConfig;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let source = resolve_config_path(config_path).context("Failed to resolve engine config")?;
    let config = EngineConfig::load(config_path).context("Failed to load engine config")?;

    println!();
    println!("⚙️  Engine Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    match &source {
        Some(path) => println!("   Source: {}", path.display()),
        None => println!("   Source: built-in defaults"),
    }
    if source.is_none() {
        if let Some(path) = default_config_path() {
            println!("   Override: create {}", path.display());
        }
    }
    println!();

    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    for line in rendered.lines() {
        println!("   {}", line);
    }
    println!();

    Ok(())
}
