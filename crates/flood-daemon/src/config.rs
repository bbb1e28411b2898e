//! Configuration for flood-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Predictive computation configuration
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Allowed browser origins. Empty allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// How the external predictive computation is located and run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Script (or executable) producing the prediction on stdout
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Interpreter used to run the script. Empty executes the script directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Working directory of the child process. Empty inherits the daemon's.
    /// A relative `script_path` is resolved against it.
    #[serde(default)]
    pub working_dir: String,

    /// Upper bound on a single run, in seconds. Zero disables the limit.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of computations running at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            interpreter: default_interpreter(),
            working_dir: String::new(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn working_dir(&self) -> Option<PathBuf> {
        (!self.working_dir.is_empty()).then(|| PathBuf::from(&self.working_dir))
    }

    /// Script location as it will be checked and executed.
    pub fn resolved_script_path(&self) -> PathBuf {
        match self.working_dir() {
            Some(dir) if self.script_path.is_relative() => dir.join(&self.script_path),
            _ => self.script_path.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_script_path() -> PathBuf {
    PathBuf::from("flood_model/predict_flood.py")
}

fn default_interpreter() -> String {
    "python".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_concurrent() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file and `FLOOD__*` variables
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // e.g. FLOOD__PREDICTOR__TIMEOUT_SECS=30
        builder = builder.add_source(
            config::Environment::with_prefix("FLOOD")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_predictor_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.script_path, PathBuf::from("flood_model/predict_flood.py"));
        assert_eq!(config.interpreter, "python");
        assert_eq!(config.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.working_dir(), None);
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = PredictorConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_relative_script_resolves_against_working_dir() {
        let config = PredictorConfig {
            working_dir: "/srv/flood".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_script_path(),
            PathBuf::from("/srv/flood/flood_model/predict_flood.py")
        );

        let absolute = PredictorConfig {
            script_path: PathBuf::from("/opt/predict.py"),
            working_dir: "/srv/flood".to_string(),
            ..Default::default()
        };
        assert_eq!(absolute.resolved_script_path(), PathBuf::from("/opt/predict.py"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = DaemonConfig::load(None).unwrap();
        assert_eq!(config.predictor.max_concurrent, 4);
        assert!(config.server.enable_cors);
    }
}
