mod commands;
mod config;
mod opts;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::frame::FrameArgs;
use commands::import::ImportArgs;
use commands::insurance::InsuranceArgs;
use commands::jmachines::JMachinesArgs;
use commands::logs::LogsArgs;
use commands::replicas::ReplicasArgs;
use commands::settings::SettingsCommand;
use config::InspectConfig;
use opts::InspectOpts;

#[derive(Parser, Debug)]
#[command(name = "xln-inspect", version, about = "Inspect XLN runtime frame history")]
struct Cli {
    #[command(flatten)]
    opts: InspectOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append frames from a JSON export to the store
    Import(ImportArgs),

    /// Show the live head of the history
    Head,

    /// Summarize one frame (live by default)
    Frame(FrameArgs),

    /// List entity replicas in a frame
    Replicas(ReplicasArgs),

    /// List jurisdiction machines in a frame
    Jmachines(JMachinesArgs),

    /// Show a frame's log entries through a filter
    Logs(LogsArgs),

    /// Fetch insurance lines for an entity from a jurisdiction snapshot
    Insurance(InsuranceArgs),

    /// Read or change dashboard settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.opts);

    let opts = &cli.opts;
    let config = InspectConfig::from_opts(opts);

    match cli.command {
        Command::Import(args) => commands::import::cmd_import(opts, &config, &args),
        Command::Head => commands::head::cmd_head(opts, &config),
        Command::Frame(args) => commands::frame::cmd_frame(opts, &config, &args),
        Command::Replicas(args) => commands::replicas::cmd_replicas(opts, &config, &args),
        Command::Jmachines(args) => commands::jmachines::cmd_jmachines(opts, &config, &args),
        Command::Logs(args) => commands::logs::cmd_logs(opts, &config, &args),
        Command::Insurance(args) => commands::insurance::cmd_insurance(opts, &config, &args).await,
        Command::Settings(cmd) => commands::settings::cmd_settings(opts, &config, &cmd),
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn setup_logging(opts: &InspectOpts) {
    let filter = if opts.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
