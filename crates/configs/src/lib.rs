//! Application configuration: TOML file first, environment variables as
//! fallback, then normalisation and validation. Any failure here is fatal
//! at startup.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

/// Token validation parameters (`JWTSettings` section).
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub audience: String,
    /// Symmetric signing key.
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            key: String::new(),
            expiry_minutes: default_expiry_minutes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
    #[serde(default = "default_true")]
    pub enable_tls: bool,
}

/// Bootstrap administrator created at startup when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_first_name")]
    pub first_name: String,
    #[serde(default = "default_admin_last_name")]
    pub last_name: String,
    #[serde(default = "default_admin_phone")]
    pub phone_number: String,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    3600
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_expiry_minutes() -> i64 {
    60
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_admin_first_name() -> String {
    "System".into()
}

fn default_admin_last_name() -> String {
    "Administrator".into()
}

fn default_admin_phone() -> String {
    "+10000000000".into()
}

const MIN_JWT_KEY_BYTES: usize = 32;
/// Longest accepted token lifetime: one year.
pub const MAX_EXPIRY_MINUTES: i64 = 365 * 24 * 60;
/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (or `config.toml`). A missing file is not an
    /// error: every required value can come from the environment instead.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io { .. }) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_and_validate_with(env_lookup)
    }

    /// Same as [`normalize_and_validate`](Self::normalize_and_validate) with an
    /// injectable variable lookup.
    pub fn normalize_and_validate_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_with(&lookup);
        self.database.validate()?;
        self.jwt.normalize_with(&lookup);
        self.jwt.validate()?;
        if let Some(smtp) = &self.smtp {
            smtp.validate()?;
        }
        if let Some(admin) = &self.admin {
            admin.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("server.port must be in 1..=65535".into()));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        self.normalize_with(&env_lookup);
    }

    fn normalize_with(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if self.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("database.url (or DATABASE_URL)"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(ConfigError::Invalid("database.url must start with postgres://, postgresql:// or sqlite:".into()));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid("database.min_connections must be >= 1".into()));
        }
        if self.max_connections < self.min_connections {
            return Err(ConfigError::Invalid("database.max_connections must be >= min_connections".into()));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid("database timeouts must be positive seconds".into()));
        }
        Ok(())
    }
}

impl JwtConfig {
    fn normalize_with(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let fill = |field: &mut String, key: &str| {
            if field.trim().is_empty() {
                if let Some(v) = lookup(key) {
                    *field = v;
                }
            }
        };
        fill(&mut self.issuer, "JWT_ISSUER");
        fill(&mut self.audience, "JWT_AUDIENCE");
        fill(&mut self.key, "JWT_KEY");
    }

    pub fn validate(&self) -> Result<()> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Missing("jwt.issuer (or JWT_ISSUER)"));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::Missing("jwt.audience (or JWT_AUDIENCE)"));
        }
        if self.key.is_empty() {
            return Err(ConfigError::Missing("jwt.key (or JWT_KEY)"));
        }
        if self.key.len() < MIN_JWT_KEY_BYTES {
            return Err(ConfigError::Invalid(format!("jwt.key must be at least {MIN_JWT_KEY_BYTES} bytes")));
        }
        if self.expiry_minutes <= 0 {
            return Err(ConfigError::Invalid("jwt.expiry_minutes must be positive".into()));
        }
        if self.expiry_minutes > MAX_EXPIRY_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "jwt.expiry_minutes must be at most {MAX_EXPIRY_MINUTES}"
            )));
        }
        Ok(())
    }
}

impl SmtpConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Missing("smtp.host"));
        }
        if !self.from.contains('@') {
            return Err(ConfigError::Invalid("smtp.from must be an email address".into()));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(ConfigError::Invalid("smtp.username and smtp.password go together".into()));
        }
        Ok(())
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') {
            return Err(ConfigError::Invalid("admin.email must be an email address".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ConfigError::Invalid(format!(
                "admin.password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        Ok(())
    }
}
