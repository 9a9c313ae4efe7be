//! Global CLI options.

use std::path::PathBuf;

use clap::Args;

/// Options shared by every command; paths and timeouts can come from env vars.
#[derive(Args, Debug, Clone, Default)]
pub struct InspectOpts {
    /// Frame store directory (env: XLN_STORE, default: ./.xln)
    #[arg(short = 's', long, global = true, env = "XLN_STORE")]
    pub store: Option<PathBuf>,

    /// Settings directory (env: XLN_SETTINGS, default: <store>/settings)
    #[arg(long = "settings-dir", global = true, env = "XLN_SETTINGS")]
    pub settings_dir: Option<PathBuf>,

    /// Insurance fetch timeout in milliseconds, 0 disables (env: XLN_FETCH_TIMEOUT_MS)
    #[arg(long, global = true, env = "XLN_FETCH_TIMEOUT_MS")]
    pub fetch_timeout_ms: Option<u64>,

    /// JSON output envelope
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output (implies --json)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Suppress notices
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Drop metadata in JSON output
    #[arg(long, global = true)]
    pub no_meta: bool,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

impl InspectOpts {
    pub fn wants_json(&self) -> bool {
        self.json || self.pretty
    }
}
