use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// External signer program (see `signer::CommandSigner`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Global configuration loaded from `~/.config/notecurl/config.toml`.
///
/// The session cookie is not stored here; it comes from `.env` or `--cookies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotecurlConfig {
    /// Write debug JSON records for every run.
    pub debug: bool,
    /// Where debug records go (None = `$XDG_DATA_HOME/notecurl/debug_responses`).
    pub debug_dir: Option<PathBuf>,
    /// Optional signer; if missing, requests carry unsigned browser headers only.
    pub signer: Option<SignerConfig>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("notecurl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<NotecurlConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<NotecurlConfig> {
    if !path.exists() {
        let default_cfg = NotecurlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: NotecurlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
