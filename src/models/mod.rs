pub mod bill;
pub mod meter;
pub mod refresh;

use serde_json::Value;

use crate::error::AppError;

/// Placeholder strings matching what the portal's own front-end shows for
/// missing fields.
pub const NO_DATA: &str = "无数据";
pub const NO_DATE: &str = "无日期";
pub const NO_PRICE: &str = "无价格信息";
pub const UNKNOWN_STATUS: &str = "未知状态";
pub const NOT_YET_PAID: &str = "未缴费";

/// Currency unit for balances and bill amounts.
pub const CURRENCY_UNIT: &str = "元";
/// Volume unit for consumed water.
pub const VOLUME_UNIT: &str = "吨";

/// Money-like fields arrive as numbers, numeric strings or nothing at all.
/// Absent, null and falsy values collapse to 0.0. Unparseable text is a hard
/// error so that a malformed payload degrades the whole refresh instead of
/// silently reading as zero.
pub(crate) fn money(record: &Value, key: &str) -> Result<f64, AppError> {
    let Some(value) = record.get(key) else {
        return Ok(0.0);
    };
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(0.0)
            } else {
                trimmed.parse::<f64>().map_err(|_| {
                    AppError::InvalidInput(format!("invalid numeric value for {key}: {s:?}"))
                })
            }
        }
        other => Err(AppError::InvalidInput(format!(
            "invalid numeric value for {key}: {other}"
        ))),
    }
}

/// Free-text fields keep strings as-is and stringify numbers (the portal is
/// not consistent about types). Anything else falls back to the placeholder.
pub(crate) fn text_or(record: &Value, key: &str, placeholder: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Date-only view of an upstream timestamp: the text before the first space.
/// Absent and empty values fall back to the placeholder.
pub(crate) fn date_only_or(record: &Value, key: &str, placeholder: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => match s.split(' ').next() {
            Some(date) => date.to_string(),
            None => s.clone(),
        },
        _ => placeholder.to_string(),
    }
}
