use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Output format for the tracing subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

/// The main configuration structure for the User Directory server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Port for the HTTP server.
    pub server_port: u16,

    /// Database connection URL for the embedded store.
    pub database_url: String,

    /// Maximum number of pooled store connections.
    pub max_connections: u32,

    /// Logging level.
    pub log_level: String,

    /// Logging output format.
    pub log_format: LogFormat,

    /// Whether to insert the demo users at startup. Off unless asked for.
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    pub fn with_defaults() -> Self {
        Self {
            server_port: 8080,
            database_url: "sqlite://userdir.db?mode=rwc".to_string(),
            max_connections: 5,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            seed_demo_data: false,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Resolution order: defaults, then the configuration file (if provided),
    /// then `USERDIR_*` environment variables for values still at their
    /// defaults, then the explicit port override.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to the configuration file.
    /// * `port_override` - Optional port number to override the configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resolved configuration is invalid.
    pub fn load_config(
        config_path: Option<PathBuf>,
        port_override: Option<u16>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Config::with_defaults();

        // Load from file if provided
        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            let file_config: Config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml") | Some("yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => {
                    return Err("Unsupported configuration format. Use 'yaml' or 'json'.".into());
                }
            };
            config = file_config;
        }

        // Use environment variables only if values are not already set
        let defaults = Config::with_defaults();
        if config.server_port == defaults.server_port {
            if let Ok(port) = env::var("USERDIR_SERVER_PORT") {
                config.server_port = port.parse().map_err(|_| {
                    "Invalid USERDIR_SERVER_PORT value: must be a valid number between 1 and 65535"
                })?;
            }
        }
        if config.database_url == defaults.database_url {
            if let Ok(db_url) = env::var("USERDIR_DATABASE_URL") {
                config.database_url = db_url;
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(log_level) = env::var("USERDIR_LOG_LEVEL") {
                config.log_level = log_level;
            }
        }
        if config.log_format == defaults.log_format {
            if let Ok(format) = env::var("USERDIR_LOG_FORMAT") {
                config.log_format = match format.to_ascii_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "text" => LogFormat::Text,
                    _ => {
                        return Err(
                            "Invalid USERDIR_LOG_FORMAT value: must be 'text' or 'json'".into()
                        );
                    }
                };
            }
        }
        if !config.seed_demo_data {
            if let Ok(seed) = env::var("USERDIR_SEED_DEMO_DATA") {
                config.seed_demo_data = matches!(seed.as_str(), "1" | "true" | "yes");
            }
        }

        // Override with command-line arguments if provided
        if let Some(port) = port_override {
            config.server_port = port;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validates the resolved configuration.
    ///
    /// # Errors
    /// Returns a message describing the first invalid value found.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.server_port == 0 {
            return Err("Invalid server port. Must be greater than 0.".into());
        }
        if self.database_url.trim().is_empty() {
            return Err("Invalid database URL. Must not be empty.".into());
        }
        if self.max_connections == 0 {
            return Err("Invalid max_connections. Must be greater than 0.".into());
        }
        Ok(())
    }
}
