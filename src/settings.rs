use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Which side effects a valid contact submission performs.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Persist the message only.
    Store,
    /// Relay the message by email only.
    Mail,
    /// Persist, then send a best-effort notification email.
    #[default]
    StoreAndNotify,
}

impl ContactPolicy {
    pub fn requires_mail(&self) -> bool {
        matches!(self, ContactPolicy::Mail)
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub contact_policy: ContactPolicy,

    #[serde(default)]
    pub email_user: Option<String>,

    #[serde(default)]
    pub email_pass: Option<String>,

    #[serde(default = "default_smtp_relay")]
    pub smtp_relay: String,

    #[serde(default)]
    pub smtp_port: Option<u16>,

    #[serde(default)]
    pub contact_recipient: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_smtp_relay() -> String {
    "smtp.gmail.com".to_string()
}

/// Everything the SMTP transport needs.
#[derive(Clone)]
pub struct MailSettings {
    pub user: String,
    pub pass: String,
    pub relay: String,
    pub port: Option<u16>,
    pub recipient: Option<String>,
    pub sender_name: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Plain deployment variables, honored when the APP_ ones are absent
        config.database_url = fill_or_env(config.database_url, &["APP_DATABASE_URL", "DATABASE_URL"])?;
        if env::var("APP_PORT").is_err() {
            if let Ok(raw) = env::var("PORT") {
                config.port = raw
                    .parse()
                    .map_err(|_| ConfigError::Message(format!("Invalid PORT value: {}", raw)))?;
            }
        }
        if config.email_user.is_none() {
            config.email_user = non_empty_env("EMAIL_USER");
        }
        if config.email_pass.is_none() {
            config.email_pass = non_empty_env("EMAIL_PASS");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.email_user.is_some() != self.email_pass.is_some() {
            errors.push("EMAIL_USER and EMAIL_PASS must be set together");
        }
        if self.contact_policy.requires_mail() && self.mail_settings().is_none() {
            errors.push("Contact policy 'mail' requires EMAIL_USER and EMAIL_PASS");
        }
        if self.cors_origins().is_empty() {
            errors.push("CORS_ALLOWED_ORIGINS cannot be empty");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn mail_settings(&self) -> Option<MailSettings> {
        match (&self.email_user, &self.email_pass) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => Some(MailSettings {
                user: user.trim().to_string(),
                pass: pass.clone(),
                relay: self.smtp_relay.clone(),
                port: self.smtp_port,
                recipient: self.contact_recipient.clone(),
                sender_name: "Portfolio Contact".to_string(),
            }),
            _ => None,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn fill_or_env(current: String, env_keys: &[&str]) -> Result<String, ConfigError> {
    if !current.trim().is_empty() {
        return Ok(current);
    }
    env_keys
        .iter()
        .find_map(|key| non_empty_env(key))
        .ok_or_else(|| ConfigError::Message(format!("{} must be set", env_keys.join(" or "))))
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(v) => v.as_str().redact(),
            None => "[MISSING]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("contact_policy", &self.contact_policy)
            .field("email_user", &self.email_user)
            .field("email_pass", &self.email_pass.redact())
            .field("smtp_relay", &self.smtp_relay)
            .field("smtp_port", &self.smtp_port)
            .field("contact_recipient", &self.contact_recipient)
            .finish()
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("user", &self.user)
            .field("pass", &self.pass.redact())
            .field("relay", &self.relay)
            .field("port", &self.port)
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio-API".into(),
            port: 5000,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/portfolio_test".into(),
            cors_allowed_origins: vec!["*".into()],
            contact_policy: ContactPolicy::Store,
            email_user: None,
            email_pass: None,
            smtp_relay: default_smtp_relay(),
            smtp_port: None,
            contact_recipient: None,
        }
    }

    #[test]
    fn store_policy_without_mail_is_valid() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert!(config.mail_settings().is_none());
    }

    #[test]
    fn mail_policy_requires_credentials() {
        let config = AppConfig {
            contact_policy: ContactPolicy::Mail,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn half_configured_mail_is_rejected() {
        let config = AppConfig {
            email_user: Some("owner@example.com".into()),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig {
            email_user: Some("owner@example.com".into()),
            email_pass: Some("hunter2-app-password".into()),
            ..base_config()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("portfolio_test"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn cors_origins_split_comma_lists() {
        let config = AppConfig {
            cors_allowed_origins: vec!["https://a.dev, https://b.dev".into(), " ".into()],
            ..base_config()
        };
        assert_eq!(config.cors_origins(), ["https://a.dev", "https://b.dev"]);
    }

    #[test]
    fn contact_policy_parses_snake_case() {
        let policy: ContactPolicy = serde_json::from_str("\"store_and_notify\"").unwrap();
        assert_eq!(policy, ContactPolicy::StoreAndNotify);
        assert!(!policy.requires_mail());
        assert!(ContactPolicy::Mail.requires_mail());
    }
}
