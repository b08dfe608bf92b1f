use std::env;
use std::str::FromStr;

use chrono::Duration;
use cron::Schedule;

use crate::shared::validation::{check_mailbox, check_mailbox_list};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// SMTP settings for outgoing reminder emails
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// STARTTLS relay when true, plain SMTP otherwise (local relays, mailpit)
    pub use_tls: bool,
    /// Sender address on every reminder
    pub from_address: String,
}

// Keep the SMTP password out of logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_tls", &self.use_tls)
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Cadence selected by the `STATUS` environment flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    /// Every 10 minutes
    pub const DEVELOPMENT_SCHEDULE: &'static str = "0 */10 * * * *";
    /// Daily at 00:07 UTC
    pub const PRODUCTION_SCHEDULE: &'static str = "0 7 0 * * *";

    pub fn from_status(status: Option<&str>) -> Self {
        match status.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "development" => RunMode::Development,
            _ => RunMode::Production,
        }
    }

    pub fn default_schedule(&self) -> &'static str {
        match self {
            RunMode::Development => Self::DEVELOPMENT_SCHEDULE,
            RunMode::Production => Self::PRODUCTION_SCHEDULE,
        }
    }
}

/// Expiry reminder job configuration
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub mode: RunMode,
    pub schedule: Schedule,
    pub window: Duration,
    /// Replaces every resolved recipient when set
    pub recipient_override: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            mail: MailConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        Ok(Self { host, port })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl MailConfig {
    const DEFAULT_SMTP_PORT: u16 = 587;

    pub fn from_env() -> Result<Self, String> {
        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| "SMTP_HOST environment variable is required".to_string())?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| Self::DEFAULT_SMTP_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| "SMTP_PORT must be a valid port number".to_string())?;

        let username = env::var("SMTP_USER")
            .map_err(|_| "SMTP_USER environment variable is required".to_string())?;

        let password = env::var("SMTP_PASSWORD")
            .map_err(|_| "SMTP_PASSWORD environment variable is required".to_string())?;

        let use_tls = parse_bool(env::var("SMTP_TLS").ok().as_deref(), true)
            .map_err(|_| "SMTP_TLS must be true or false".to_string())?;

        let from_address = resolve_sender(env::var("MAIL_FROM").ok().as_deref(), &username)?;

        Ok(Self {
            smtp_host,
            smtp_port,
            username,
            password,
            use_tls,
            from_address,
        })
    }
}

impl NotificationConfig {
    const DEFAULT_WINDOW_HOURS: i64 = 24;

    pub fn from_env() -> Result<Self, String> {
        let mode = RunMode::from_status(env::var("STATUS").ok().as_deref());

        let cron_override = env::var("NOTIFICATION_CRON").ok();
        let schedule = resolve_schedule(mode, cron_override.as_deref())?;

        let window_hours = env::var("NOTIFICATION_WINDOW_HOURS")
            .unwrap_or_else(|_| Self::DEFAULT_WINDOW_HOURS.to_string())
            .parse::<i64>()
            .map_err(|_| "NOTIFICATION_WINDOW_HOURS must be a valid number".to_string())?;
        if window_hours <= 0 {
            return Err("NOTIFICATION_WINDOW_HOURS must be greater than zero".to_string());
        }

        let override_var = env::var("NOTIFICATION_RECIPIENT_OVERRIDE").ok();
        let recipient_override = parse_recipient_override(override_var.as_deref())?;

        let window = Duration::try_hours(window_hours)
            .ok_or_else(|| "NOTIFICATION_WINDOW_HOURS is out of range".to_string())?;

        Ok(Self {
            mode,
            schedule,
            window,
            recipient_override,
        })
    }
}

/// Pick the cron cadence: a non-blank override wins over the mode default
pub fn resolve_schedule(mode: RunMode, cron_override: Option<&str>) -> Result<Schedule, String> {
    let expr = cron_override
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(mode.default_schedule());
    parse_schedule(expr)
}

/// Parse a 6-field (seconds first) cron expression
pub fn parse_schedule(expr: &str) -> Result<Schedule, String> {
    Schedule::from_str(expr.trim())
        .map_err(|e| format!("Invalid cron expression '{}': {}", expr, e))
}

/// `MAIL_FROM` when set, otherwise the SMTP login; must parse as a mailbox
fn resolve_sender(mail_from: Option<&str>, username: &str) -> Result<String, String> {
    let sender = mail_from
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(username)
        .to_string();

    check_mailbox(&sender)
        .map_err(|e| format!("MAIL_FROM (or SMTP_USER) is not a valid sender: {}", e))?;
    Ok(sender)
}

fn parse_recipient_override(value: Option<&str>) -> Result<Option<String>, String> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(list) => {
            check_mailbox_list(list)
                .map_err(|e| format!("NOTIFICATION_RECIPIENT_OVERRIDE is invalid: {}", e))?;
            Ok(Some(list.to_string()))
        }
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool, ()> {
    match value.map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(()),
        },
    }
}
