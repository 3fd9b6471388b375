//! Output directories under the XDG data home.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::NotecurlConfig;

const DEBUG_SUBDIR: &str = "debug_responses";

/// Resolved (not created) output directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    pub debug: PathBuf,
}

impl DataDirs {
    pub fn from_xdg() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("notecurl")?;
        Ok(Self {
            debug: xdg_dirs.get_data_home().join(DEBUG_SUBDIR),
        })
    }

    /// Applies overrides from the config file.
    pub fn with_config(mut self, cfg: &NotecurlConfig) -> Self {
        if let Some(dir) = &cfg.debug_dir {
            self.debug = dir.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_debug_dir_overrides_default() {
        let dirs = DataDirs {
            debug: PathBuf::from("/data/notecurl/debug_responses"),
        };
        let cfg = NotecurlConfig {
            debug_dir: Some(PathBuf::from("/tmp/dbg")),
            ..NotecurlConfig::default()
        };
        assert_eq!(dirs.clone().with_config(&cfg).debug, PathBuf::from("/tmp/dbg"));
        assert_eq!(dirs.clone().with_config(&NotecurlConfig::default()), dirs);
    }

    #[test]
    fn default_debug_dir_is_named_debug_responses() {
        let dirs = DataDirs::from_xdg().unwrap();
        assert!(dirs.debug.ends_with(DEBUG_SUBDIR));
    }
}
