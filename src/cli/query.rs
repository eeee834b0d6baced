use serde_json::json;
use tabled::Tabled;

use crate::auth::credentials::configured_api;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;
use crate::models::bill::BillSnapshot;
use crate::models::meter::MeterSnapshot;
use crate::models::{CURRENCY_UNIT, VOLUME_UNIT};

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "METER")]
    meter: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
    #[tabled(rename = "ARREARAGE")]
    arrearage: String,
    #[tabled(rename = "USAGE")]
    usage: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "METER")]
    meter: String,
    #[tabled(rename = "VOLUME")]
    volume: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PAID")]
    paid: String,
}

pub async fn handle_balance(config: &RuntimeConfig) -> Result<(), AppError> {
    let api = configured_api(config.verbose)?;
    let envelope = api.fetch_meter_list().await?;
    let snapshot = envelope
        .first_record()
        .map(MeterSnapshot::from_json)
        .transpose()?;

    let Some(meter) = snapshot else {
        print_json(&json!({"meter": api.meter_number(), "error": "no data"}));
        return Ok(());
    };

    match config.output_mode {
        OutputMode::Table => print_table(&[BalanceRow {
            meter: meter.meter_number.clone(),
            name: meter.meter_name.clone(),
            balance: format!("{:.2} {}", meter.balance, CURRENCY_UNIT),
            arrearage: format!("{:.2} {}", meter.arrearage, CURRENCY_UNIT),
            usage: format!("{} {}", meter.current_usage, VOLUME_UNIT),
            status: meter.user_status.clone(),
        }]),
        OutputMode::Json => print_json(&serde_json::to_value(&meter)?),
    }
    Ok(())
}

pub async fn handle_bill(config: &RuntimeConfig) -> Result<(), AppError> {
    let api = configured_api(config.verbose)?;
    let envelope = api.fetch_payment_info().await?;
    let snapshot = envelope
        .first_record()
        .map(BillSnapshot::from_json)
        .transpose()?;

    let Some(bill) = snapshot else {
        print_json(&json!({
            "meter": api.meter_number(),
            "query_year": api.query_year(),
            "error": "no data",
        }));
        return Ok(());
    };

    match config.output_mode {
        OutputMode::Table => print_table(&[BillRow {
            period: bill.period.clone(),
            meter: bill.meter_number.clone(),
            volume: format!("{} {}", bill.volume, VOLUME_UNIT),
            amount: format!("{:.2} {}", bill.amount, CURRENCY_UNIT),
            status: bill.payment_status.clone(),
            paid: bill.payment_date.clone(),
        }]),
        OutputMode::Json => print_json(&serde_json::to_value(&bill)?),
    }
    Ok(())
}
