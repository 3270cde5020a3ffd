//! Layered configuration.
//!
//! Priority, lowest to highest: built-in defaults, config file, CLI flags
//! (and their env fallbacks), `GUESS_` prefixed environment variables.

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Upper bound for handling a whole request.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Random word provider (GET).
    pub word_source_url: String,
    /// Similarity service (POST).
    pub similarity_url: String,
    /// Timeout for each outbound call.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Signing key for the session cookie, at least 64 bytes.
    #[serde(default)]
    pub cookie_secret: Option<String>,
    /// Idle time after which a session is evicted.
    pub ttl_secs: u64,
    pub cleanup_interval_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServicesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("services.word_source_url", "https://trouve-mot.fr/api/random")?
            .set_default(
                "services.similarity_url",
                "http://word2vec.nicolasfley.fr/similarity",
            )?
            .set_default("services.request_timeout_secs", 5)?
            .set_default("session.cookie_name", "session_id")?
            .set_default("session.ttl_secs", 30 * 60)?
            .set_default("session.cleanup_interval_secs", 60)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path)).required(true)),
            None => builder
                .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false)),
        };

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }

        // E.g. GUESS_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("GUESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        for (key, value) in [
            ("services.word_source_url", &self.services.word_source_url),
            ("services.similarity_url", &self.services.similarity_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                config::ConfigError::Message(format!("{key} is not a valid URL ({value}): {e}"))
            })?;
        }

        if self.services.request_timeout_secs == 0 || self.server.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "request timeouts must be at least one second".to_string(),
            ));
        }
        if self.session.cleanup_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "session.cleanup_interval_secs must be at least one second".to_string(),
            ));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "session.cookie_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
