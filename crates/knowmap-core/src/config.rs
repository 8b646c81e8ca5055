//! KnowMap Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for local runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::DomainMap;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KnowMapConfig {
    /// Entity -> domain lookup table
    pub domains: DomainMap,

    /// Output artifact locations
    pub output: OutputConfig,

    /// Static layout parameters
    pub layout: LayoutConfig,

    /// External dependency parser
    pub parser: ParserConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl KnowMapConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Output
        if let Ok(path) = std::env::var("KNOWMAP_HTML_PATH") {
            config.output.html_path = path.into();
        }
        if let Ok(path) = std::env::var("KNOWMAP_JSON_PATH") {
            config.output.json_path = path.into();
        }
        if let Ok(path) = std::env::var("KNOWMAP_PLOT_PATH") {
            config.output.plot_path = path.into();
        }
        if let Ok(flag) = std::env::var("KNOWMAP_OPEN_BROWSER") {
            config.output.open_browser = parse_bool("KNOWMAP_OPEN_BROWSER", &flag)?;
        }

        // Layout
        if let Ok(seed) = std::env::var("KNOWMAP_LAYOUT_SEED") {
            config.layout.seed = Some(seed.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KNOWMAP_LAYOUT_SEED".to_string(),
                value: seed,
            })?);
        }

        // Parser command (whitespace separated)
        if let Ok(cmd) = std::env::var("KNOWMAP_PARSER_CMD") {
            config.parser.command = cmd.split_whitespace().map(str::to_string).collect();
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let is_set = |key: &str| std::env::var(key).is_ok();

        // any variable that is set wins, even when it matches the default
        if is_set("KNOWMAP_HTML_PATH") {
            self.output.html_path = env_config.output.html_path;
        }
        if is_set("KNOWMAP_JSON_PATH") {
            self.output.json_path = env_config.output.json_path;
        }
        if is_set("KNOWMAP_PLOT_PATH") {
            self.output.plot_path = env_config.output.plot_path;
        }
        if is_set("KNOWMAP_OPEN_BROWSER") {
            self.output.open_browser = env_config.output.open_browser;
        }
        if env_config.layout.seed.is_some() {
            self.layout.seed = env_config.layout.seed;
        }
        if !env_config.parser.command.is_empty() {
            self.parser.command = env_config.parser.command;
        }
        if is_set("LOG_LEVEL") {
            self.logging.level = env_config.logging.level;
        }

        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Interactive HTML network
    pub html_path: PathBuf,

    /// Node-link JSON export
    pub json_path: PathBuf,

    /// Static SVG plot
    pub plot_path: PathBuf,

    /// Open rendered artifacts in the system browser/viewer
    pub open_browser: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from("graph.html"),
            json_path: PathBuf::from("graph.json"),
            plot_path: PathBuf::from("graph.svg"),
            open_browser: true,
        }
    }
}

/// Force-directed layout configuration for the static plot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Seed for initial node positions; random when unset
    pub seed: Option<u64>,

    /// Number of simulation steps
    pub iterations: usize,

    /// Simulation time step per iteration
    pub time_step: f32,

    /// Figure width in pixels
    pub width: f64,

    /// Figure height in pixels
    pub height: f64,

    /// Repulsion between nodes
    pub force_charge: f32,

    /// Spring strength along edges
    pub force_spring: f32,

    /// Upper bound on the force applied to a node per step
    pub force_max: f32,

    /// Node velocity scale
    pub node_speed: f32,

    /// Velocity damping per step
    pub damping_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: None,
            iterations: 400,
            time_step: 0.035,
            width: 1000.0,
            height: 600.0,
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        }
    }
}

/// External dependency parser configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Program and arguments; reads text on stdin, writes a JSON token stream
    pub command: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = KnowMapConfig::default();
        assert_eq!(config.output.html_path, PathBuf::from("graph.html"));
        assert_eq!(config.output.json_path, PathBuf::from("graph.json"));
        assert!(config.layout.seed.is_none());
        assert!(config.domains.is_empty());
        assert!(config.parser.command.is_empty());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[domains]
"Machine Learning" = "Technology"
Google = "Organization"

[layout]
seed = 7

[parser]
command = ["python3", "parse.py"]
"#
        )
        .unwrap();

        let config = KnowMapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.domains.lookup("Machine Learning"), "Technology");
        assert_eq!(config.domains.lookup("Google"), "Organization");
        assert_eq!(config.layout.seed, Some(7));
        assert_eq!(config.layout.iterations, LayoutConfig::default().iterations);
        assert_eq!(config.parser.command, vec!["python3", "parse.py"]);
        assert_eq!(config.output.plot_path, PathBuf::from("graph.svg"));
    }

    #[test]
    fn test_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nseed = \"not a number\"").unwrap();

        let err = KnowMapConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_env_equal_to_default_still_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\nhtml_path = \"custom.html\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        std::env::set_var("KNOWMAP_HTML_PATH", "graph.html");
        std::env::set_var("LOG_LEVEL", "info");
        let config = KnowMapConfig::from_file(file.path())
            .and_then(KnowMapConfig::with_env_override);
        std::env::remove_var("KNOWMAP_HTML_PATH");
        std::env::remove_var("LOG_LEVEL");

        let config = config.unwrap();
        assert_eq!(config.output.html_path, PathBuf::from("graph.html"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("K", "true").unwrap());
        assert!(parse_bool("K", "On").unwrap());
        assert!(!parse_bool("K", "0").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }
}
