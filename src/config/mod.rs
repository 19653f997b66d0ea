use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginMode {
    /// Any address on the school domain is let in; the password is ignored.
    Open,
    /// The hosted backend mails a one-time link and its answer decides.
    MagicLink,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub mode: LoginMode,
    pub allowed_domain: String,
    pub admin_email: String,
    pub session_secret: String,
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Local,
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: String,
}

/// Hosted backend-as-a-service endpoint (REST table + one-time-link auth).
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "announcements".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("auth.mode", "open")?
            .set_default("auth.allowed_domain", "@gfis.edu.ph")?
            .set_default("auth.admin_email", "admin@gfis.edu.ph")?
            .set_default("auth.session_secret", "change-me-in-production")?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.secure_cookies", false)?
            .set_default("storage.backend", "local")?
            .set_default("storage.data_dir", "data")?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables (GFIS_BOARD__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("GFIS_BOARD").separator("__"))

            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let needs_remote = self.storage.backend == StorageBackend::Remote
            || self.auth.mode == LoginMode::MagicLink;
        if needs_remote && self.remote.is_none() {
            return Err(ConfigError::Message(
                "remote.url and remote.anon_key are required for the remote backend or magic-link login".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            auth: AuthConfig {
                mode: LoginMode::Open,
                allowed_domain: "@gfis.edu.ph".to_string(),
                admin_email: "admin@gfis.edu.ph".to_string(),
                session_secret: "change-me-in-production".to_string(),
                session_duration_hours: 24,
                secure_cookies: false,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                data_dir: "data".to_string(),
            },
            remote: None,
        }
    }
}
