use std::env;

use crate::api::client::WaterApi;
use crate::auth::keychain::{self, Secrets};
use crate::auth::profile::{self, Profile, DEFAULT_AREA_ID, DEFAULT_WATER_CORP_ID};
use crate::error::AppError;

/// Everything the client needs to talk to the portal for one account.
#[derive(Debug, Clone)]
pub struct Account {
    pub token: String,
    pub cookie: String,
    pub meter_number: String,
    pub query_year: String,
    pub water_corp_id: i64,
    pub area_id: i64,
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

pub(crate) fn current_year() -> String {
    chrono::Local::now().format("%Y").to_string()
}

/// Account from environment variables, for scripted runs. Token, cookie and
/// meter number are required; the year and ids fall back to defaults.
pub fn account_from_env() -> Option<Account> {
    let token = env_nonempty("PTWATER_TOKEN")?;
    let cookie = env_nonempty("PTWATER_COOKIE")?;
    let meter_number = env_nonempty("PTWATER_METER_NUMBER")?;
    let query_year = env_nonempty("PTWATER_QUERY_YEAR").unwrap_or_else(current_year);
    let water_corp_id = env_nonempty("PTWATER_WATER_CORP_ID")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WATER_CORP_ID);
    let area_id = env_nonempty("PTWATER_AREA_ID")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_AREA_ID);
    Some(Account {
        token,
        cookie,
        meter_number,
        query_year,
        water_corp_id,
        area_id,
    })
}

/// Stored account: environment overrides first, then keychain and profile.
pub fn get_account() -> Result<Account, AppError> {
    if let Some(account) = account_from_env() {
        return Ok(account);
    }
    let secrets = keychain::get_secrets()?.ok_or(AppError::NotConfigured)?;
    let profile = profile::get_profile()?.ok_or(AppError::NotConfigured)?;
    if secrets.token.is_empty() || secrets.cookie.is_empty() {
        return Err(AppError::NotConfigured);
    }
    Ok(Account {
        token: secrets.token,
        cookie: secrets.cookie,
        meter_number: profile.meter_number,
        query_year: profile.query_year,
        water_corp_id: profile.water_corp_id,
        area_id: profile.area_id,
    })
}

pub fn store_account(account: &Account) -> Result<(), AppError> {
    keychain::store_secrets(&Secrets {
        token: account.token.clone(),
        cookie: account.cookie.clone(),
    })?;
    profile::store_profile(&Profile {
        meter_number: account.meter_number.clone(),
        query_year: account.query_year.clone(),
        water_corp_id: account.water_corp_id,
        area_id: account.area_id,
    })
}

pub fn clear_account() -> Result<(), AppError> {
    keychain::clear_secrets()?;
    profile::clear_profile()
}

/// Portal base URL override for development and tests.
pub fn base_url_from_env() -> Option<String> {
    env_nonempty("PTWATER_BASE_URL")
}

/// Build a client from the stored account.
pub fn configured_api(verbose: bool) -> Result<WaterApi, AppError> {
    let account = get_account()?;
    WaterApi::new(base_url_from_env(), &account, verbose)
}
