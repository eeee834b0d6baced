use keyring::Entry;

use crate::error::AppError;

const SERVICE: &str = "ptwater";

fn entry(key: &str) -> Result<Entry, AppError> {
    Entry::new(SERVICE, key).map_err(|e| AppError::Keychain(e.to_string()))
}

fn get_value(key: &str) -> Result<Option<String>, AppError> {
    let entry = entry(key)?;
    match entry.get_password() {
        Ok(val) => Ok(Some(val)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(AppError::Keychain(e.to_string())),
    }
}

fn set_value(key: &str, value: &str) -> Result<(), AppError> {
    let entry = entry(key)?;
    entry
        .set_password(value)
        .map_err(|e| AppError::Keychain(e.to_string()))
}

fn delete_value(key: &str) -> Result<(), AppError> {
    let entry = entry(key)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(AppError::Keychain(e.to_string())),
    }
}

/// Secrets the portal hands out per browser session: the account token and
/// the session cookie it must travel with.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub token: String,
    pub cookie: String,
}

pub fn store_secrets(secrets: &Secrets) -> Result<(), AppError> {
    set_value("token", &secrets.token)?;
    set_value("cookie", &secrets.cookie)?;
    Ok(())
}

pub fn get_secrets() -> Result<Option<Secrets>, AppError> {
    let token = match get_value("token")? {
        Some(t) => t,
        None => return Ok(None),
    };
    let cookie = match get_value("cookie")? {
        Some(c) => c,
        None => return Ok(None),
    };
    Ok(Some(Secrets { token, cookie }))
}

pub fn clear_secrets() -> Result<(), AppError> {
    delete_value("token")?;
    delete_value("cookie")?;
    Ok(())
}
