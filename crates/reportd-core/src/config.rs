//! Configuration module
//!
//! Environment-driven configuration for the report platform service. The
//! document-store credential and SMTP settings are consumed by collaborators
//! (generators, the mail sender); the core only loads and validates them.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAIL_SEND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    environment: String,
    server_port: u16,
    reports_dir: PathBuf,
    request_timeout_secs: u64,
    cors_origins: Vec<String>,
    mongodb_password: Option<String>,
    smtp_host: String,
    smtp_port: u16,
    smtp_account: Option<String>,
    smtp_password: Option<String>,
    mail_send_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Best effort; a missing .env file is fine.
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "dev".to_string());

        let server_port = parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?;
        let reports_dir =
            PathBuf::from(env::var("REPORTS_DIR").unwrap_or_else(|_| "reports".to_string()));
        let request_timeout_secs =
            parse_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Self {
            environment,
            server_port,
            reports_dir,
            request_timeout_secs,
            cors_origins,
            mongodb_password: env::var("MONGODB_PASSWORD").ok(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: parse_env("SMTP_PORT", DEFAULT_SMTP_PORT)?,
            smtp_account: env::var("SMTP_ACCOUNT").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            mail_send_timeout_secs: parse_env(
                "MAIL_SEND_TIMEOUT_SECS",
                DEFAULT_MAIL_SEND_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if self.mail_send_timeout_secs == 0 {
            bail!("MAIL_SEND_TIMEOUT_SECS must be greater than zero");
        }
        // Mail credentials come in pairs.
        if self.smtp_account.is_some() != self.smtp_password.is_some() {
            bail!("SMTP_ACCOUNT and SMTP_PASSWORD must be set together");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn reports_dir(&self) -> &PathBuf {
        &self.reports_dir
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn mongodb_password(&self) -> Option<&str> {
        self.mongodb_password.as_deref()
    }

    pub fn smtp_host(&self) -> &str {
        &self.smtp_host
    }

    pub fn smtp_port(&self) -> u16 {
        self.smtp_port
    }

    /// SMTP account/password pair when mail mode is configured.
    pub fn smtp_credentials(&self) -> Option<(&str, &str)> {
        match (&self.smtp_account, &self.smtp_password) {
            (Some(account), Some(password)) => Some((account.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn mail_send_timeout_secs(&self) -> u64 {
        self.mail_send_timeout_secs
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
