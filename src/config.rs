//! Process configuration, read once at startup.

use {
    crate::domain::money::Currency,
    std::{net::SocketAddr, time::Duration},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ChapaConfig {
    pub base_url: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl SmtpConfig {
    /// Only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub chapa: ChapaConfig,
    pub currency: Currency,
    pub callback_url: String,
    pub return_url: String,
    /// `None` means emails are logged, not sent.
    pub smtp: Option<SmtpConfig>,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CHAPA_BASE_URL: &str = "https://api.chapa.co/v1";
const DEFAULT_MAIL_FROM: &str = "Wedding Platform <noreply@localhost>";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let bind_addr = parse(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;
        let db_max_connections = var("DB_MAX_CONNECTIONS")
            .map(|v| parse("DB_MAX_CONNECTIONS", v))
            .transpose()?
            .unwrap_or(20);
        let timeout_secs: u64 = var("CHAPA_TIMEOUT_SECS")
            .map(|v| parse("CHAPA_TIMEOUT_SECS", v))
            .transpose()?
            .unwrap_or(30);

        let currency = match var("PAYMENT_CURRENCY") {
            Some(raw) => Currency::try_from(raw.as_str()).map_err(|e| ConfigError::Invalid {
                name: "PAYMENT_CURRENCY",
                reason: e.to_string(),
            })?,
            None => Currency::Etb,
        };

        let smtp = match var("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: var("SMTP_PORT")
                    .map(|v| parse("SMTP_PORT", v))
                    .transpose()?
                    .unwrap_or(587),
                username: var("SMTP_USERNAME"),
                password: var("SMTP_PASSWORD"),
                from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections,
            bind_addr,
            chapa: ChapaConfig {
                base_url: var("CHAPA_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CHAPA_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                secret_key: required("CHAPA_SECRET_KEY")?,
                webhook_secret: required("CHAPA_WEBHOOK_SECRET")?,
                timeout: Duration::from_secs(timeout_secs),
            },
            currency,
            callback_url: required("PAYMENT_CALLBACK_URL")?,
            return_url: required("PAYMENT_RETURN_URL")?,
            smtp,
        })
    }
}

fn parse<T>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
