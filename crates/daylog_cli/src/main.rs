//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `daylog_core` wiring end to end: config, store, merge, rollup.
//! - Print one line per check so output stays easy to diff.
//!
//! Usage: `daylog_cli [config.yaml] [--persist]`
//!
//! Without `--persist` an in-memory store is used so nothing is written.

use chrono::Utc;
use daylog_core::db::migrations::latest_version;
use daylog_core::sync::manual::ManualEntryInput;
use daylog_core::{
    day_vitals, init_from_config, DayKey, DaylogConfig, Reconciler, RollupService, SqliteKvStore,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daylog error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let persist = args.iter().any(|arg| arg == "--persist");
    let config_path = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("daylog.yaml");

    let config = DaylogConfig::load(config_path)?;
    let logging_on = init_from_config(&config)?;

    println!("daylog_core ping={}", daylog_core::ping());
    println!("daylog_core version={}", daylog_core::core_version());
    println!("daylog_core schema_version={}", latest_version());
    println!("daylog_core logging={}", if logging_on { "on" } else { "off" });

    let store = if persist {
        Arc::new(SqliteKvStore::open(config.database_path())?)
    } else {
        Arc::new(SqliteKvStore::open_in_memory()?)
    };
    let reconciler = Reconciler::new(Arc::clone(&store));
    let rollups = RollupService::new(store);

    let now = Utc::now();
    let today = DayKey::new(now.date_naive()).ok_or("current date has no four-digit year")?;
    let input = ManualEntryInput {
        sleep_hours: Some("7.5".to_string()),
        workout_minutes: Some("30".to_string()),
        ..ManualEntryInput::default()
    };
    let partial = input.into_partial(now)?;

    let daily = reconciler.merge_daily_stats(today, &partial).await?;
    let monthly = rollups.refresh_month(today.month())?;

    println!("daily={}", serde_json::to_string(&daily)?);
    println!("vitals={}", serde_json::to_string(&day_vitals(&daily))?);
    println!("monthly={}", serde_json::to_string(&monthly)?);
    Ok(())
}
