use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{money, text_or};

/// Normalized view of one entry of the portal's meter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterSnapshot {
    pub meter_number: String,
    pub meter_name: String,
    pub meter_address: String,
    pub meter_mobile: String,
    pub user_status: String,
    pub balance: f64,
    pub arrearage: f64,
    pub last_read_date: String,
    pub last_read_value: String,
    pub next_read_date: String,
    pub next_read_value: String,
    pub current_usage: f64,
}

impl MeterSnapshot {
    /// Pure mapping from one raw `data` element. Missing text reads as
    /// empty, missing amounts as zero.
    pub fn from_json(record: &Value) -> Result<Self, AppError> {
        Ok(Self {
            meter_number: text_or(record, "meterNumber", ""),
            meter_name: text_or(record, "meterName", ""),
            meter_address: text_or(record, "meterAddress", ""),
            meter_mobile: text_or(record, "meterMobile", ""),
            user_status: text_or(record, "userStatus", ""),
            balance: money(record, "balance")?,
            arrearage: money(record, "arrearage")?,
            last_read_date: text_or(record, "lastreaddate", ""),
            last_read_value: text_or(record, "lastto", ""),
            next_read_date: text_or(record, "nextreaddate", ""),
            next_read_value: text_or(record, "nextto", ""),
            current_usage: money(record, "consumedVolume")?,
        })
    }
}
