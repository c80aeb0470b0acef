use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;

use crate::domain::types::RecipeRules;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing auth tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Auth token lifetime in seconds (default 7 days). Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: u64,
    /// Directory recipe images are written to (default `media`). Env var: `MEDIA_ROOT`.
    pub media_root: PathBuf,
    /// Prefix prepended to stored image paths in responses (default `/media/`).
    /// Env var: `MEDIA_URL`.
    pub media_url: String,
    /// Env vars: `RECIPE_NAME_MAX_LEN`, `COOKING_TIME_MIN`, `COOKING_TIME_MAX`.
    pub recipe_rules: RecipeRules,
    /// Default page size for paginated lists (default 6). Env var: `PAGE_SIZE`.
    pub page_size: u32,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = RecipeRules::default();
        let recipe_rules = RecipeRules {
            name_max_len: optional("RECIPE_NAME_MAX_LEN", defaults.name_max_len)?,
            cooking_time_min: optional("COOKING_TIME_MIN", defaults.cooking_time_min)?,
            cooking_time_max: optional("COOKING_TIME_MAX", defaults.cooking_time_max)?,
        };
        anyhow::ensure!(
            recipe_rules.cooking_time_min <= recipe_rules.cooking_time_max,
            "COOKING_TIME_MIN must not exceed COOKING_TIME_MAX"
        );
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_port: optional("API_PORT", 8000)?,
            token_ttl_secs: optional("TOKEN_TTL_SECS", 7 * 24 * 60 * 60)?,
            media_root: PathBuf::from(optional("MEDIA_ROOT", "media".to_owned())?),
            media_url: optional("MEDIA_URL", "/media/".to_owned())?,
            recipe_rules,
            page_size: optional("PAGE_SIZE", 6)?,
        })
    }
}
