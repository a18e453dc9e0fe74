use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_check_in_per_min: u32,

    pub api_prefix: String,

    /// Offset of the business timezone every wall-clock rule is evaluated in.
    pub utc_offset_hours: i32,
    pub approval_cache_ttl_secs: u64,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", 1000)?,
            rate_check_in_per_min: or_default("RATE_CHECK_IN_PER_MIN", 30)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            utc_offset_hours: or_default("BUSINESS_UTC_OFFSET_HOURS", 8)?,
            approval_cache_ttl_secs: or_default("APPROVAL_CACHE_TTL_SECS", 300)?,
        };
        config.business_offset()?;
        Ok(config)
    }

    pub fn business_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).with_context(|| {
            format!(
                "BUSINESS_UTC_OFFSET_HOURS {} is out of range",
                self.utc_offset_hours
            )
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: jwt_secret.to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_protected_per_min: 1000,
            rate_check_in_per_min: 30,
            api_prefix: "/api".to_string(),
            utc_offset_hours: 8,
            approval_cache_ttl_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_offset_is_validated() {
        let mut config = Config::for_tests("secret");
        assert_eq!(config.business_offset().unwrap().local_minus_utc(), 8 * 3600);

        config.utc_offset_hours = 30;
        assert!(config.business_offset().is_err());
    }
}
