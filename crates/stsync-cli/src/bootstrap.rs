use std::path::Path;

use anyhow::Context;
use stsync_config::StsyncConfig;

/// Load `.env` from the working directory (if present), then the layered settings.
pub fn load_config() -> anyhow::Result<StsyncConfig> {
    load_dotenv(Path::new(".env"))?;
    StsyncConfig::load().context("failed to load stsync configuration")
}

fn load_dotenv(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        tracing::debug!("no .env file in working directory");
        return Ok(());
    }
    dotenvy::from_path(path)
        .with_context(|| format!("failed to load dotenv file at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded dotenv file");
    Ok(())
}
