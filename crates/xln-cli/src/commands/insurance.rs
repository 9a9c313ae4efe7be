//! `xln-inspect insurance` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, bail};
use clap::Args;
use serde_json::{Value, json};
use xln_inspect::format::{format_amount, format_expiry, short_id};
use xln_jurisdiction::{
    FileJurisdiction, InsuranceFetcher, InsuranceLine, InsuranceView, Jurisdiction,
};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

#[derive(Args, Debug)]
pub struct InsuranceArgs {
    /// Entity whose coverage to show
    #[arg(long)]
    pub entity: String,

    /// Jurisdiction snapshot file (env: XLN_JURISDICTION)
    #[arg(long, env = "XLN_JURISDICTION")]
    pub jurisdiction: PathBuf,

    /// Token decimals used to render remaining coverage
    #[arg(long, default_value_t = 18)]
    pub decimals: u8,
}

pub async fn cmd_insurance(
    opts: &InspectOpts,
    config: &InspectConfig,
    args: &InsuranceArgs,
) -> Result<()> {
    let jurisdiction = FileJurisdiction::open(&args.jurisdiction)?;
    let name = jurisdiction.name().to_string();
    let mut fetcher = InsuranceFetcher::new(Arc::new(jurisdiction));
    if let Some(timeout) = config.fetch_timeout {
        fetcher = fetcher.with_timeout(timeout);
    }

    let meta = json!({ "jurisdiction": name, "entityId": args.entity });
    let lines = match fetcher.fetch(&args.entity).await {
        InsuranceView::Loaded { lines, .. } => lines,
        InsuranceView::Unavailable { .. } => {
            let message = format!("insurance not available in jurisdiction {name}");
            return print_empty(opts, &message, Some(meta));
        }
        InsuranceView::Failed { message, .. } => bail!(message),
        InsuranceView::Idle | InsuranceView::Loading { .. } => {
            bail!("insurance fetch for {} did not complete", args.entity)
        }
    };
    if lines.is_empty() {
        let message = format!("no insurance lines for entity {}", args.entity);
        return print_empty(opts, &message, Some(meta));
    }

    let data = if opts.wants_json() {
        serde_json::to_value(&lines)?
    } else {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        let rendered: Vec<String> = lines
            .iter()
            .map(|line| insurance_line(line, args.decimals, now))
            .collect();
        Value::String(rendered.join("\n"))
    };
    print_success(opts, data, Some(meta), vec![])
}

fn insurance_line(line: &InsuranceLine, decimals: u8, now: u64) -> String {
    format!(
        "{}  token {}  remaining {}  {}",
        short_id(&line.insurer),
        line.token_id,
        format_amount(&line.remaining, decimals),
        format_expiry(&line.expires_at, now)
    )
}
