/*
 * Responsibility
 * - 環境変数や設定の読み込み (store 接続、テーブル名、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗。per-request では再検証しない)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub store_url: String,
    pub users_table: String,
    pub user_events_table: String,
    pub dashboards_table: String,

    pub jwt_signing_key: String,
    pub jwt_leeway_seconds: u64,

    pub auth_service_login_url: Url,
    pub auth_service_create_user_url: Url,
    pub auth_service_refresh_url: Url,
    pub auth_service_jwt: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let store_url =
            std::env::var("STORE_URL").map_err(|_| ConfigError::Missing("STORE_URL"))?;

        let users_table =
            std::env::var("USERS_TABLE").unwrap_or_else(|_| "users".to_string());

        let user_events_table =
            std::env::var("USER_EVENTS_TABLE").unwrap_or_else(|_| "userEvents".to_string());

        let dashboards_table =
            std::env::var("DASHBOARDS_TABLE").unwrap_or_else(|_| "dashboards".to_string());

        let jwt_signing_key = std::env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?;
        if jwt_signing_key.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SIGNING_KEY"));
        }

        let jwt_leeway_seconds = std::env::var("JWT_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let auth_service_login_url = required_url("AUTH_SERVICE_LOGIN_URL")?;
        let auth_service_create_user_url = required_url("AUTH_SERVICE_CREATE_USER_URL")?;
        let auth_service_refresh_url = required_url("AUTH_SERVICE_REFRESH_URL")?;

        let auth_service_jwt = std::env::var("AUTH_SERVICE_JWT")
            .map_err(|_| ConfigError::Missing("AUTH_SERVICE_JWT"))?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            store_url,
            users_table,
            user_events_table,
            dashboards_table,
            jwt_signing_key,
            jwt_leeway_seconds,
            auth_service_login_url,
            auth_service_create_user_url,
            auth_service_refresh_url,
            auth_service_jwt,
        })
    }
}

fn required_url(key: &'static str) -> Result<Url, ConfigError> {
    let raw = std::env::var(key).map_err(|_| ConfigError::Missing(key))?;
    Url::parse(&raw).map_err(|_| ConfigError::Invalid(key))
}
