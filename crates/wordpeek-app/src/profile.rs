use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use wordpeek_config::Config;

/// Load a JSON profile; missing fields fall back to env/defaults
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Pretty JSON of `config`, used by `--print-config`
pub fn dump_config(config: &Config) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}
