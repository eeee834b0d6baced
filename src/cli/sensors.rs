use serde_json::Value;
use tabled::Tabled;

use crate::auth::credentials::configured_api;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::coordinator::RefreshCoordinator;
use crate::error::AppError;
use crate::sensor::{self, SensorReading};

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "SENSOR")]
    sensor: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "UNIT")]
    unit: &'static str,
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub async fn handle(config: &RuntimeConfig) -> Result<(), AppError> {
    let api = configured_api(config.verbose)?;
    let mut coordinator = RefreshCoordinator::new(api);
    let result = coordinator.refresh().await;
    let readings = sensor::all_readings(result);

    match config.output_mode {
        OutputMode::Table => {
            let rows: Vec<SensorRow> = readings
                .iter()
                .map(|r| SensorRow {
                    sensor: r.name,
                    value: cell(&r.value),
                    unit: r.unit.unwrap_or(""),
                })
                .collect();
            print_table(&rows);
        }
        OutputMode::Json => {
            let readings: Vec<Value> = readings.iter().map(SensorReading::to_json).collect();
            print_json(&Value::Array(readings));
        }
    }
    Ok(())
}
