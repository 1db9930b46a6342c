use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::export::{ExportOptions, DEFAULT_SHEET_NAME, DEFAULT_TITLE};
use crate::schedule::ReconcileDefaults;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub api_timeout: Duration,
    pub bind_addr: String,
    pub items_per_page: usize,
    pub default_building_id: i64,
    pub default_building_name: String,
    pub export_sheet_name: String,
    pub export_title: String,
    /// Show the static placeholder collections when a first load fails.
    pub placeholder_fallback: bool,
    /// Serve from an in-process copy of the placeholder data instead of the
    /// hospital service.
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".to_string(),
            api_timeout: Duration::from_secs(30),
            bind_addr: "127.0.0.1:3000".to_string(),
            items_per_page: 10,
            default_building_id: 2,
            default_building_name: "Hospital Principal".to_string(),
            export_sheet_name: DEFAULT_SHEET_NAME.to_string(),
            export_title: DEFAULT_TITLE.to_string(),
            placeholder_fallback: false,
            offline: false,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("{} has an invalid value: {}", key, raw))),
        _ => Ok(default),
    }
}

fn parse_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let items_per_page: usize = parse_var("ITEMS_PER_PAGE", defaults.items_per_page)?;
        if items_per_page == 0 {
            return Err(AppError::BadRequest("ITEMS_PER_PAGE must be positive".to_string()));
        }

        Ok(Self {
            api_url: env::var("AGENDA_API_URL").unwrap_or(defaults.api_url),
            api_timeout: Duration::from_secs(parse_var("AGENDA_API_TIMEOUT_SECS", 30u64)?),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            items_per_page,
            default_building_id: parse_var("DEFAULT_BUILDING_ID", defaults.default_building_id)?,
            default_building_name: env::var("DEFAULT_BUILDING_NAME")
                .unwrap_or(defaults.default_building_name),
            export_sheet_name: env::var("EXPORT_SHEET_NAME").unwrap_or(defaults.export_sheet_name),
            export_title: env::var("EXPORT_TITLE").unwrap_or(defaults.export_title),
            placeholder_fallback: parse_flag("AGENDA_PLACEHOLDER_FALLBACK"),
            offline: parse_flag("AGENDA_OFFLINE"),
        })
    }

    pub fn reconcile_defaults(&self) -> ReconcileDefaults {
        ReconcileDefaults {
            building_name: self.default_building_name.clone(),
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            sheet_name: self.export_sheet_name.clone(),
            title: self.export_title.clone(),
        }
    }
}
