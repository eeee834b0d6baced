use std::time::Duration;

use chrono::Local;

use crate::api::client::WaterApi;
use crate::api::response::ApiEnvelope;
use crate::error::AppError;
use crate::models::bill::BillSnapshot;
use crate::models::meter::MeterSnapshot;
use crate::models::refresh::{RefreshResult, RefreshState};

/// Polls the portal and keeps the latest result. Single writer; consumers
/// borrow the cached result and never trigger fetches themselves.
pub struct RefreshCoordinator {
    api: WaterApi,
    data: Option<RefreshResult>,
}

impl RefreshCoordinator {
    /// The portal data moves at most once a day; poll accordingly.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn new(api: WaterApi) -> Self {
        Self { api, data: None }
    }

    /// Run one refresh cycle and cache the outcome. Fetch and normalization
    /// failures come back as a degraded result with the error text attached,
    /// never as an Err, so consumers keep working off the cached state.
    pub async fn refresh(&mut self) -> &RefreshResult {
        let result = match self.fetch_cycle().await {
            Ok(result) => result,
            Err(err) => {
                eprintln!("Refresh failed: {err}");
                RefreshResult::degraded(self.api.query_year().to_string(), err.to_string())
            }
        };
        &*self.data.insert(result)
    }

    /// Latest cached result; None before the first refresh.
    pub fn data(&self) -> Option<&RefreshResult> {
        self.data.as_ref()
    }

    pub fn state(&self) -> RefreshState {
        self.data.as_ref().map_or(RefreshState::Stale, RefreshResult::state)
    }

    async fn fetch_cycle(&self) -> Result<RefreshResult, AppError> {
        let meter = self.api.fetch_meter_list().await?;
        let bill = self.api.fetch_payment_info().await?;
        normalize(&meter, &bill, self.api.query_year().to_string())
    }
}

/// Map the two envelopes into one result record. Pure apart from the
/// timestamp: the same envelopes produce the same snapshots.
fn normalize(
    meter: &ApiEnvelope,
    bill: &ApiEnvelope,
    query_year: String,
) -> Result<RefreshResult, AppError> {
    Ok(RefreshResult {
        meter: meter.first_record().map(MeterSnapshot::from_json).transpose()?,
        bill: bill.first_record().map(BillSnapshot::from_json).transpose()?,
        query_year,
        last_update: Local::now(),
        error: None,
    })
}
