use std::env;
use std::sync::Arc;

use dotenvy::dotenv;

use agenda_backend::config::AppConfig;
use agenda_backend::hospital::{HospitalConfig, HospitalHttpClient};
use agenda_backend::state::AppState;

fn is_dry_run() -> bool {
    !env::args().any(|a| a == "--apply")
}

fn output_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1).cloned())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let client = HospitalHttpClient::new(HospitalConfig::from_app_config(&config))?;
    let state = AppState::new(Arc::new(client), config);
    let dashboard = state.dashboard();

    let report = dashboard.load_all().await;
    for error in &report.errors {
        eprintln!("load error: {}", error);
    }
    println!(
        "Loaded {} schedule entries, {} doctors, {} rooms -> {} records",
        report.schedule_entries, report.doctors, report.rooms, report.records
    );

    let file = dashboard.export().await;
    let path = output_path().unwrap_or_else(|| file.file_name());

    if is_dry_run() {
        println!(
            "[DRY RUN] Would write {} ({}) with {} rows",
            path,
            file.content_type(),
            report.records
        );
        return Ok(());
    }

    let bytes = file.into_bytes();
    std::fs::write(&path, &bytes)?;
    println!("Wrote {} ({} bytes)", path, bytes.len());

    Ok(())
}
