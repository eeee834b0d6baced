use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use crate::auth::credentials::configured_api;
use crate::cli::output::print_json;
use crate::config::RuntimeConfig;
use crate::coordinator::RefreshCoordinator;
use crate::error::AppError;
use crate::sensor::{self, SensorReading};

/// Foreground refresh loop: refresh, print, sleep, repeat. Cycles never
/// overlap because the next one starts only after the sleep returns.
pub async fn handle(interval_hours: u64, config: &RuntimeConfig) -> Result<(), AppError> {
    if interval_hours == 0 {
        return Err(AppError::InvalidInput(
            "interval must be at least one hour".to_string(),
        ));
    }

    let api = configured_api(config.verbose)?;
    let mut coordinator = RefreshCoordinator::new(api);
    let interval = Duration::from_secs(interval_hours * 60 * 60);

    eprintln!("Polling every {interval_hours} hour(s). Press Ctrl-C to stop.");
    loop {
        let result = coordinator.refresh().await;
        let state = result.state();
        let readings: Vec<Value> = sensor::all_readings(result)
            .iter()
            .map(SensorReading::to_json)
            .collect();
        print_json(&json!({
            "state": state,
            "sensors": readings,
        }));

        tokio::select! {
            _ = sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Received Ctrl-C. Exiting...");
                return Ok(());
            }
        }
    }
}
