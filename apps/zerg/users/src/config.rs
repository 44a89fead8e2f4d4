use core_config::{env_or_default, server::ServerConfig, ConfigError, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Startup behaviour, selected by `MODE`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Drop the users collection on start
    Dev,
    /// Keep existing data
    Persistent,
}

impl Mode {
    /// `DEV` (the default, any case) selects [`Mode::Dev`]; any other value keeps data
    pub fn from_env() -> Self {
        if env_or_default("MODE", "DEV").eq_ignore_ascii_case("DEV") {
            Mode::Dev
        } else {
            Mode::Persistent
        }
    }

    pub fn resets_data(&self) -> bool {
        matches!(self, Mode::Dev)
    }
}

/// NATS JetStream target for user change events
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NatsConfig {
    pub url: String,
    pub stream: String,
    pub subject: String,
}

impl FromEnv for NatsConfig {
    /// - NATS_URL: defaults to nats://localhost:4222
    /// - USERS_STREAM: defaults to USERS
    /// - USERS_SUBJECT: defaults to users_topic
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("NATS_URL", "nats://localhost:4222"),
            stream: env_or_default("USERS_STREAM", "USERS"),
            subject: env_or_default("USERS_SUBJECT", "users_topic"),
        })
    }
}

/// Service configuration composed from the shared config components
#[derive(Clone)]
pub struct Config {
    pub service_name: String,
    pub environment: Environment,
    pub mode: Mode,
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    pub nats: NatsConfig,
    /// Key for password hashing (SECRET_KEY)
    pub secret_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_name = env_or_default("SERVICE_NAME", "user-service");
        let mongo = MongoConfig::from_env()?.with_app_name(service_name.clone());

        Ok(Self {
            environment: Environment::from_env(),
            mode: Mode::from_env(),
            server: ServerConfig::from_env()?,
            mongo,
            nats: NatsConfig::from_env()?,
            secret_key: env_or_default("SECRET_KEY", "MySecretKey"),
            service_name,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("service_name", &self.service_name)
            .field("environment", &self.environment)
            .field("mode", &self.mode)
            .field("server", &self.server)
            .field("mongo_database", &self.mongo.database)
            .field("nats", &self.nats)
            .field("secret_key", &"[redacted]")
            .finish()
    }
}
