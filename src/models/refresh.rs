use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::bill::BillSnapshot;
use crate::models::meter::MeterSnapshot;

/// Whether the cached result came from a successful refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    Fresh,
    Stale,
}

/// Output of one refresh cycle. Replaced wholesale every cycle: a failed
/// fetch wipes the previous snapshots rather than keeping them, so consumers
/// see the failure instead of silently stale data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshResult {
    pub meter: Option<MeterSnapshot>,
    pub bill: Option<BillSnapshot>,
    pub query_year: String,
    pub last_update: DateTime<Local>,
    pub error: Option<String>,
}

impl RefreshResult {
    pub fn degraded(query_year: String, error: String) -> Self {
        Self {
            meter: None,
            bill: None,
            query_year,
            last_update: Local::now(),
            error: Some(error),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.error.is_none()
    }

    pub fn state(&self) -> RefreshState {
        if self.is_fresh() {
            RefreshState::Fresh
        } else {
            RefreshState::Stale
        }
    }
}
