use std::fs;
use std::path::Path;

use anyhow::Context;
use preauth_ledger::RegistryConfig;

/// Load registry settings from TOML, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: RegistryConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
