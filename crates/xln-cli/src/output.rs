//! Shared output helpers for human and JSON modes.
//!
//! Human mode prints primary data to stdout and notices to stderr. JSON mode
//! wraps responses in `{ data, meta?, warnings? }` and respects `--pretty`,
//! `--no-meta`, and `--quiet`.

use std::io::Write;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::opts::InspectOpts;

pub fn print_success(
    opts: &InspectOpts,
    data: Value,
    meta: Option<Value>,
    mut warnings: Vec<String>,
) -> Result<()> {
    if opts.quiet {
        warnings.clear();
    }
    if opts.wants_json() {
        print_json(opts, data, meta, warnings)
    } else {
        print_human(data, warnings)
    }
}

/// Nothing to show: the message is the whole answer in human mode and a
/// warning next to `null` data in JSON mode.
pub fn print_empty(opts: &InspectOpts, message: &str, meta: Option<Value>) -> Result<()> {
    if opts.wants_json() {
        print_json(opts, Value::Null, meta, vec![message.to_string()])
    } else {
        print_value(Value::String(message.to_string()))
    }
}

fn print_json(
    opts: &InspectOpts,
    data: Value,
    meta: Option<Value>,
    warnings: Vec<String>,
) -> Result<()> {
    let mut root = Map::new();
    root.insert("data".into(), data);
    if !opts.no_meta {
        if let Some(m) = meta {
            root.insert("meta".into(), m);
        }
    }
    if !warnings.is_empty() {
        root.insert(
            "warnings".into(),
            warnings.into_iter().map(Value::String).collect(),
        );
    }
    let root = Value::Object(root);
    if opts.pretty {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{}", serde_json::to_string(&root)?);
    }
    Ok(())
}

fn print_human(data: Value, warnings: Vec<String>) -> Result<()> {
    let mut stderr = std::io::stderr();
    for w in warnings {
        writeln!(stderr, "notice: {w}")?;
    }
    print_value(data)
}

fn print_value(value: Value) -> Result<()> {
    match value {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}
