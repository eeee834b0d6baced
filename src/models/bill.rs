use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{
    date_only_or, money, text_or, NOT_YET_PAID, NO_DATA, NO_DATE, NO_PRICE, UNKNOWN_STATUS,
};

/// Normalized view of one payment record, front-end placeholders included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillSnapshot {
    pub period: String,
    pub address: String,
    pub user_name: String,
    pub user_code: String,
    pub meter_number: String,
    pub last_read_value: String,
    pub last_read_date: String,
    pub current_read_value: String,
    pub current_read_date: String,
    pub volume: f64,
    pub price_detail: String,
    pub amount: f64,
    pub payment_status: String,
    pub payment_date: String,
}

impl BillSnapshot {
    /// Pure mapping from one raw `data` element. The payment date keeps only
    /// the date portion of the upstream timestamp.
    pub fn from_json(record: &Value) -> Result<Self, AppError> {
        Ok(Self {
            period: text_or(record, "costDate", NO_DATA),
            address: text_or(record, "address", NO_DATA),
            user_name: text_or(record, "cardname", NO_DATA),
            user_code: text_or(record, "cardno", NO_DATA),
            meter_number: text_or(record, "meternumber", NO_DATA),
            last_read_value: text_or(record, "lastRead", "0"),
            last_read_date: text_or(record, "lastMetertime", NO_DATE),
            current_read_value: text_or(record, "currentRead", "0"),
            current_read_date: text_or(record, "metertime", NO_DATE),
            volume: money(record, "consumedVolume")?,
            price_detail: text_or(record, "price1", NO_PRICE),
            amount: money(record, "payablePrincipal")?,
            payment_status: text_or(record, "payStatus", UNKNOWN_STATUS),
            payment_date: date_only_or(record, "paymentDate", NOT_YET_PAID),
        })
    }
}
