use dialoguer::{Input, Password};
use serde_json::json;

use crate::api::client::WaterApi;
use crate::auth::credentials::{self, account_from_env, Account};
use crate::auth::profile::{DEFAULT_AREA_ID, DEFAULT_WATER_CORP_ID};
use crate::cli::output::print_json;
use crate::config::RuntimeConfig;
use crate::error::AppError;

/// Year range the portal meaningfully answers for.
const YEAR_MIN: i64 = 2000;
const YEAR_MAX: i64 = 2100;

pub async fn handle_setup(config: &RuntimeConfig) -> Result<(), AppError> {
    let account = match account_from_env() {
        Some(account) => account,
        None => prompt_account()?,
    };
    validate_account(&account)?;

    let api = WaterApi::new(credentials::base_url_from_env(), &account, config.verbose)?;
    if let Err(err) = api.check_connection().await {
        let (category, hint) = classify_setup_error(&err);
        eprintln!("Connection check failed ({category}): {hint}");
        return Err(err);
    }

    credentials::store_account(&account)?;
    print_json(&json!({
        "status": "configured",
        "meter_number": account.meter_number,
        "query_year": account.query_year,
    }));
    Ok(())
}

pub async fn handle_status(_config: &RuntimeConfig) -> Result<(), AppError> {
    match credentials::get_account() {
        Ok(account) => {
            print_json(&json!({
                "status": "configured",
                "meter_number": account.meter_number,
                "query_year": account.query_year,
                "water_corp_id": account.water_corp_id,
                "area_id": account.area_id,
                "has_token": !account.token.is_empty(),
                "has_cookie": !account.cookie.is_empty(),
            }));
        }
        Err(AppError::NotConfigured) => {
            print_json(&json!({
                "status": "not_configured",
            }));
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

pub async fn handle_clear(_config: &RuntimeConfig) -> Result<(), AppError> {
    credentials::clear_account()?;
    print_json(&json!({"status": "cleared"}));
    Ok(())
}

pub async fn handle_test(config: &RuntimeConfig) -> Result<(), AppError> {
    let api = credentials::configured_api(config.verbose)?;
    match api.check_connection().await {
        Ok(()) => {
            print_json(&json!({"status": "ok", "meter_number": api.meter_number()}));
            Ok(())
        }
        Err(err) => {
            let (category, hint) = classify_setup_error(&err);
            eprintln!("Connection check failed ({category}): {hint}");
            Err(err)
        }
    }
}

fn prompt_account() -> Result<Account, AppError> {
    let meter_number: String = Input::new()
        .with_prompt("Meter number")
        .interact_text()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let token: String = Password::new()
        .with_prompt("Portal token")
        .interact()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let cookie: String = Input::new()
        .with_prompt("Session cookie")
        .interact_text()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let query_year: String = Input::new()
        .with_prompt("Query year")
        .default(credentials::current_year())
        .interact_text()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let water_corp_id: i64 = Input::new()
        .with_prompt("Water corp id")
        .default(DEFAULT_WATER_CORP_ID)
        .interact_text()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let area_id: i64 = Input::new()
        .with_prompt("Area id")
        .default(DEFAULT_AREA_ID)
        .interact_text()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    Ok(Account {
        token,
        cookie,
        meter_number,
        query_year,
        water_corp_id,
        area_id,
    })
}

fn validate_account(account: &Account) -> Result<(), AppError> {
    if account.meter_number.trim().is_empty() {
        return Err(AppError::InvalidInput("meter number is required".to_string()));
    }
    if account.token.trim().is_empty() {
        return Err(AppError::InvalidInput("token is required".to_string()));
    }
    if account.cookie.trim().is_empty() {
        return Err(AppError::InvalidInput("cookie is required".to_string()));
    }
    let year: i64 = account.query_year.trim().parse().map_err(|_| {
        AppError::InvalidInput(format!(
            "query year must be a number, got {:?}",
            account.query_year
        ))
    })?;
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(AppError::InvalidInput(format!(
            "query year must be between {YEAR_MIN} and {YEAR_MAX}, got {year}"
        )));
    }
    if !(1..=100).contains(&account.water_corp_id) {
        return Err(AppError::InvalidInput(
            "water corp id must be between 1 and 100".to_string(),
        ));
    }
    if !(0..=100).contains(&account.area_id) {
        return Err(AppError::InvalidInput(
            "area id must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Bucket a probe failure the way the portal fails in practice, with a
/// human hint alongside.
fn classify_setup_error(err: &AppError) -> (&'static str, &'static str) {
    match err {
        AppError::Status { status: 500, body } if body.contains("NumberFormatException") => (
            "number_format_error",
            "the portal rejected the corp/area ids; they must be plain integers",
        ),
        AppError::Status { status: 500, .. } => {
            ("server_error", "the portal reported a server error")
        }
        AppError::UnexpectedResponse { .. } => (
            "invalid_response",
            "the portal did not answer with JSON; the session cookie may have expired",
        ),
        AppError::Http(_) => ("network_error", "network error reaching the portal"),
        _ => ("auth_failed", "authentication failed; check the token and cookie"),
    }
}
