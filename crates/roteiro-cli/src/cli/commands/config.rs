//! `roteiro config` handlers.

use anyhow::{Context, Result};
use roteiro_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

/// Writes the commented default config. Refuses to overwrite.
pub fn init() -> Result<()> {
    let path = paths::config_path();
    Config::init(&path).with_context(|| format!("init config at {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    let toml = Config::generate().context("generate default config")?;
    print!("{toml}");
    Ok(())
}
