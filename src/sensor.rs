use serde_json::{json, Map, Value};

use crate::models::refresh::RefreshResult;
use crate::models::{CURRENCY_UNIT, NO_DATA};

/// Cadence advertised on the update-time sensor.
const UPDATE_INTERVAL_TEXT: &str = "24小时";

/// One read-only value derived from a cached refresh result, with the
/// attribute bag the portal front-end would show next to it.
#[derive(Debug, Clone)]
pub struct SensorReading {
    pub id: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub value: Value,
    pub attributes: Map<String, Value>,
}

impl SensorReading {
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "unit": self.unit,
            "value": self.value,
            "attributes": self.attributes,
        })
    }
}

pub fn all_readings(result: &RefreshResult) -> Vec<SensorReading> {
    vec![
        balance_reading(result),
        last_bill_reading(result),
        update_time_reading(result),
    ]
}

/// 水费余额: the account balance, with meter and account context.
pub fn balance_reading(result: &RefreshResult) -> SensorReading {
    let mut attributes = Map::new();
    let value = match &result.meter {
        None => {
            attributes.insert("error".to_string(), json!(NO_DATA));
            Value::Null
        }
        Some(meter) => {
            insert_common(&mut attributes, result);
            attributes.insert("meter_number".to_string(), json!(meter.meter_number));
            attributes.insert("meter_address".to_string(), json!(meter.meter_address));
            attributes.insert("user_status".to_string(), json!(meter.user_status));
            attributes.insert("arrearage".to_string(), json!(meter.arrearage));
            attributes.insert("last_read_date".to_string(), json!(meter.last_read_date));
            attributes.insert("last_read_value".to_string(), json!(meter.last_read_value));
            attributes.insert("current_usage".to_string(), json!(meter.current_usage));
            insert_error(&mut attributes, result);
            json!(meter.balance)
        }
    };
    SensorReading {
        id: "balance",
        name: "水费余额",
        unit: Some(CURRENCY_UNIT),
        value,
        attributes,
    }
}

/// 上月水费: the latest bill amount, with reading and payment context.
pub fn last_bill_reading(result: &RefreshResult) -> SensorReading {
    let mut attributes = Map::new();
    let value = match &result.bill {
        None => {
            attributes.insert("error".to_string(), json!(NO_DATA));
            Value::Null
        }
        Some(bill) => {
            insert_common(&mut attributes, result);
            attributes.insert("period".to_string(), json!(bill.period));
            attributes.insert("address".to_string(), json!(bill.address));
            attributes.insert("user_name".to_string(), json!(bill.user_name));
            attributes.insert("user_code".to_string(), json!(bill.user_code));
            attributes.insert("meter_number".to_string(), json!(bill.meter_number));
            attributes.insert("last_read_value".to_string(), json!(bill.last_read_value));
            attributes.insert("last_read_date".to_string(), json!(bill.last_read_date));
            attributes.insert("current_read_value".to_string(), json!(bill.current_read_value));
            attributes.insert("current_read_date".to_string(), json!(bill.current_read_date));
            attributes.insert("volume".to_string(), json!(bill.volume));
            attributes.insert("price_detail".to_string(), json!(bill.price_detail));
            attributes.insert("payment_status".to_string(), json!(bill.payment_status));
            attributes.insert("payment_date".to_string(), json!(bill.payment_date));
            insert_error(&mut attributes, result);
            json!(bill.amount)
        }
    };
    SensorReading {
        id: "last_bill",
        name: "上月水费",
        unit: Some(CURRENCY_UNIT),
        value,
        attributes,
    }
}

/// 更新时间: when the cache was last written. Degraded cycles still update
/// it, so the error shows up here even when the other two read empty.
pub fn update_time_reading(result: &RefreshResult) -> SensorReading {
    let mut attributes = Map::new();
    attributes.insert("query_year".to_string(), json!(result.query_year));
    attributes.insert("update_interval".to_string(), json!(UPDATE_INTERVAL_TEXT));
    insert_error(&mut attributes, result);
    SensorReading {
        id: "update_time",
        name: "更新时间",
        unit: None,
        value: json!(result.last_update.to_rfc3339()),
        attributes,
    }
}

fn insert_common(attributes: &mut Map<String, Value>, result: &RefreshResult) {
    attributes.insert("query_year".to_string(), json!(result.query_year));
    attributes.insert("last_update".to_string(), json!(result.last_update.to_rfc3339()));
}

fn insert_error(attributes: &mut Map<String, Value>, result: &RefreshResult) {
    if let Some(error) = &result.error {
        attributes.insert("error".to_string(), json!(error));
    }
}
