use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

const MIN_ADMIN_TOKEN_LENGTH: usize = 16;

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

/// Which persistence implementation backs the repositories.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mongo,
    Memory,
}

/// Whether a project must carry an image URL.
///
/// `Required` demands an absolute http(s) URL; `Optional` accepts any
/// non-empty value (relative asset paths included) or no value at all.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ImageUrlPolicy {
    Required,
    Optional,
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

    #[serde(default = "default_backend")]
    pub database_backend: DatabaseBackend,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_image_url_policy")]
    pub image_url_policy: ImageUrlPolicy,

    /// Bearer token guarding the admin routes. `None` leaves them public.
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_backend() -> DatabaseBackend {
    DatabaseBackend::Mongo
}
fn default_database_name() -> String {
    "portfolio".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_image_url_policy() -> ImageUrlPolicy {
    ImageUrlPolicy::Required
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.database_url.trim().is_empty() {
            config.database_url = env::var("APP_DATABASE_URL").unwrap_or_default();
        }
        config.admin_token = config.admin_token.filter(|t| !t.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Settings for in-process tests: memory backend, no admin token.
    pub fn for_tests() -> Self {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio-API-Test".to_string(),
            port: 0,
            host: default_host(),
            worker_count: 1,
            database_backend: DatabaseBackend::Memory,
            database_url: String::new(),
            database_name: "portfolio_test".to_string(),
            cors_allowed_origins: default_cors_origins(),
            image_url_policy: ImageUrlPolicy::Required,
            admin_token: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_backend == DatabaseBackend::Mongo && self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty when the mongo backend is selected");
        }
        if self.database_name.trim().is_empty() {
            errors.push("DATABASE_NAME cannot be empty");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.admin_token.as_ref().is_some_and(|t| t.len() < MIN_ADMIN_TOKEN_LENGTH) {
            errors.push("ADMIN_TOKEN must be at least 16 characters");
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

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
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
            .field("database_backend", &self.database_backend)
            .field("database_url", &self.database_url.redact())
            .field("database_name", &self.database_name)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("image_url_policy", &self.image_url_policy)
            .field("admin_token", &self.admin_token.as_deref().map(|t| t.redact()))
            .finish()
    }
}
