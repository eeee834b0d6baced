use serde_json::Value;

use crate::error::AppError;

/// Message the portal attaches to successful meter-list queries. It shows up
/// next to `success: false` often enough that it has to count as success.
pub const METER_LIST_OK_MESSAGE: &str = "获取水表列表成功";

/// Top-level object the portal wraps every response in: some combination of
/// `success`, `message` and `data`, each optional and loosely typed. Key
/// presence is tracked apart from null because the validation rules care
/// about the difference.
#[derive(Debug, Clone)]
pub struct ApiEnvelope {
    success: Option<Value>,
    message: Option<Value>,
    data: Option<Value>,
}

impl ApiEnvelope {
    pub fn from_value(value: &Value) -> Self {
        Self {
            success: value.get("success").cloned(),
            message: value.get("message").cloned(),
            data: value.get("data").cloned(),
        }
    }

    pub fn has_success(&self) -> bool {
        self.success.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// `data` carries an actual value, not just the key.
    pub fn data_non_null(&self) -> bool {
        matches!(&self.data, Some(v) if !v.is_null())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }

    pub fn message_contains(&self, needle: &str) -> bool {
        self.message().is_some_and(|m| m.contains(needle))
    }

    /// Truthiness in the loose upstream sense: absent, null, false, 0, ""
    /// and empty containers all count as false.
    pub fn success_truthy(&self) -> bool {
        self.success.as_ref().is_some_and(truthy)
    }

    /// Reject responses that declare failure, except when the portal
    /// contradicts itself: a `data` key or the known list-succeeded message
    /// alongside `success: false` is treated as success.
    pub fn require_success(&self) -> Result<(), AppError> {
        let reports_failure = matches!(&self.success, Some(v) if !truthy(v));
        if reports_failure && !self.has_data() && !self.message_contains(METER_LIST_OK_MESSAGE) {
            return Err(AppError::Api(
                self.message().unwrap_or("Unknown error").to_string(),
            ));
        }
        Ok(())
    }

    /// First element of the `data` list. Absent, null, non-list and empty
    /// data all yield None.
    pub fn first_record(&self) -> Option<&Value> {
        self.data.as_ref()?.as_array()?.first()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
