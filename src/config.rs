use std::net::IpAddr;

use crate::forms::export::ColumnPolicy;
use crate::forms::registry::FormTypeKey;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub login_url: String,
    pub form_types: Vec<FormTypeKey>,
    pub per_page: i64,
    pub csv_columns: ColumnPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("FORMDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_HOST: {e}"))?;

        let port: u16 = env_or("FORMDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_PORT: {e}"))?;

        let log_level = env_or("FORMDESK_LOG_LEVEL", "info");
        let login_url = env_or("FORMDESK_LOGIN_URL", "/admin/login/");

        let form_types = parse_form_types(&env_or("FORMDESK_FORM_TYPES", "forms.formpage"))?;

        let per_page: i64 = env_or("FORMDESK_PER_PAGE", "20")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_PER_PAGE: {e}"))?;
        if per_page < 1 {
            return Err("Invalid FORMDESK_PER_PAGE: must be at least 1".to_string());
        }

        let csv_columns = ColumnPolicy::parse(&env_or("FORMDESK_CSV_COLUMNS", "first-record"))
            .ok_or_else(|| {
                "Invalid FORMDESK_CSV_COLUMNS: expected 'first-record' or 'union'".to_string()
            })?;

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            log_level,
            login_url,
            form_types,
            per_page,
            csv_columns,
        })
    }
}

/// Parses `app_label.model` pairs separated by commas.
pub fn parse_form_types(raw: &str) -> Result<Vec<FormTypeKey>, String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .map_err(|e| format!("Invalid FORMDESK_FORM_TYPES entry '{s}': {e}"))
        })
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
