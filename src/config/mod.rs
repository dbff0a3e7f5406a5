use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_duration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    /// Upper bound on a single provider round-trip before the request is
    /// failed with a timeout error instead of hanging.
    #[serde(default = "default_stripe_timeout_secs")]
    pub timeout_secs: u64,
    /// Where the provider sends the browser after checkout. Defaults are
    /// derived from `server.base_url` when unset.
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

fn default_stripe_timeout_secs() -> u64 {
    15
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            enabled: false,
            timeout_secs: default_stripe_timeout_secs(),
            success_url: None,
            cancel_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SmtpConfig {
    #[serde(default)]
    pub enabled: bool,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("stripe.enabled", false)?
            .set_default("smtp.enabled", false)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with LYCEUM__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("LYCEUM").separator("__"))

            .build()?;

        config.try_deserialize()
    }

    /// Checkout redirect target after a successful payment.
    pub fn checkout_success_url(&self) -> String {
        self.stripe
            .success_url
            .clone()
            .unwrap_or_else(|| format!("{}/users/payments", self.server.base_url))
    }

    /// Checkout redirect target after an abandoned payment.
    pub fn checkout_cancel_url(&self) -> String {
        self.stripe
            .cancel_url
            .clone()
            .unwrap_or_else(|| format!("{}/materials", self.server.base_url))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://lyceum.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_secret: "change-me-in-production".to_string(),
                session_duration_hours: 24,
            },
            stripe: StripeConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}
