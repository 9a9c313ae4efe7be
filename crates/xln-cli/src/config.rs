use std::path::PathBuf;
use std::time::Duration;

use crate::opts::InspectOpts;

pub const DEFAULT_STORE_DIR: &str = ".xln";
const SETTINGS_SUBDIR: &str = "settings";

#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Directory holding `frames/frames.log`.
    pub store_root: PathBuf,
    pub settings_dir: PathBuf,
    /// `None` lets an insurance request run until the source answers.
    pub fetch_timeout: Option<Duration>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        let store_root = PathBuf::from(DEFAULT_STORE_DIR);
        Self {
            settings_dir: store_root.join(SETTINGS_SUBDIR),
            store_root,
            fetch_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl InspectConfig {
    /// Defaults overridden by flags (which already carry their env fallbacks).
    pub fn from_opts(opts: &InspectOpts) -> Self {
        let mut config = Self::default();
        if let Some(store) = &opts.store {
            config.store_root = store.clone();
            config.settings_dir = store.join(SETTINGS_SUBDIR);
        }
        if let Some(dir) = &opts.settings_dir {
            config.settings_dir = dir.clone();
        }
        if let Some(ms) = opts.fetch_timeout_ms {
            config.fetch_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        config
    }
}
