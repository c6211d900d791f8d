//! # Alert record check
//!
//! Reads an alert record JSON document from the given path, or from stdin
//! when no path is given, runs the field validation and prints the resulting
//! validation state. Exits with status 1 when the record is invalid.
//!
//! The BEx query service is not contacted: a BEx technical name is reported
//! with status `validating` and does not make the record invalid.

use alert_admin_common::{validate, AlertRecord};
use anyhow::{Context, Result};
use std::io::Read;
use std::{env, fs, io, process};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging with environment filter
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alert_check=info".parse()?)
                .add_directive("alert_admin_common=info".parse()?),
        )
        .init();

    let raw = match env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?
        }
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read alert record from stdin")?;
            raw
        }
    };

    let record: AlertRecord =
        serde_json::from_str(&raw).context("Failed to parse alert record")?;
    let state = validate(&record);

    println!(
        "{}",
        serde_json::to_string_pretty(&state).context("Failed to render validation state")?
    );

    if state.has_pending() {
        warn!(
            technical_name = %record.technical_name,
            "BEx technical name was not checked against the query service"
        );
    }

    if state.is_valid() {
        info!(title = %record.title, "Alert record is valid");
        Ok(())
    } else {
        warn!(errors = ?state.errors(), "Alert record is invalid");
        process::exit(1);
    }
}
