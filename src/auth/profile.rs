use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_WATER_CORP_ID: i64 = 3;
pub const DEFAULT_AREA_ID: i64 = 0;

/// Non-secret account settings, stored as JSON in the user config dir. The
/// ids stay signed integers end to end; the portal rejects anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub meter_number: String,
    pub query_year: String,
    #[serde(default = "default_water_corp_id")]
    pub water_corp_id: i64,
    #[serde(default = "default_area_id")]
    pub area_id: i64,
}

fn default_water_corp_id() -> i64 {
    DEFAULT_WATER_CORP_ID
}

fn default_area_id() -> i64 {
    DEFAULT_AREA_ID
}

/// `PTWATER_CONFIG_DIR` overrides the location so tests and scripted runs
/// stay out of the real config directory.
fn config_dir() -> Result<PathBuf, AppError> {
    if let Ok(dir) = std::env::var("PTWATER_CONFIG_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|d| d.join("ptwater"))
        .ok_or_else(|| AppError::InvalidInput("no config directory on this platform".to_string()))
}

fn profile_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join("config.json"))
}

pub fn store_profile(profile: &Profile) -> Result<(), AppError> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    fs::write(profile_path()?, serde_json::to_string_pretty(profile)?)?;
    Ok(())
}

pub fn get_profile() -> Result<Option<Profile>, AppError> {
    let path = profile_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

pub fn clear_profile() -> Result<(), AppError> {
    let path = profile_path()?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
