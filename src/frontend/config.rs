use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::logging::{LogConfig, LogFormat};

/// Run configuration for the demonstration CLI, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Namelist file executed in the embedded interpreter.
    pub namelist: PathBuf,

    #[serde(default)]
    pub queries: Vec<QuerySpec>,

    #[serde(default)]
    pub profiles: Vec<ProfileSpec>,

    #[serde(default)]
    pub log: LogSection,
}

/// One value to read out of the namelist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    pub name: String,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub index: usize,
}

/// One profile function to evaluate at sample points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub index: usize,

    /// Coordinate vectors to evaluate at.
    #[serde(default)]
    pub at: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn log_config(&self) -> LogConfig {
        let level = match self.log.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        let mut config = LogConfig::new().with_level(level);
        if let Some(format) = &self.log.format {
            config = config.with_format(match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            });
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            namelist = "input.py"

            [[queries]]
            name = "my_pi"

            [[queries]]
            name = "charge"
            component = "Species"
            index = 1

            [[profiles]]
            name = "my_func"
            at = [[3.0], [4.0]]

            [log]
            level = "debug"
            format = "compact"
            "#,
        )
        .unwrap();

        assert_eq!(config.namelist, PathBuf::from("input.py"));
        assert_eq!(config.queries.len(), 2);
        assert_eq!(config.queries[1].component.as_deref(), Some("Species"));
        assert_eq!(config.queries[1].index, 1);
        assert_eq!(config.profiles[0].at, vec![vec![3.0], vec![4.0]]);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn sections_default_to_empty() {
        let config: Config = toml::from_str(r#"namelist = "input.py""#).unwrap();
        assert!(config.queries.is_empty());
        assert!(config.profiles.is_empty());
        assert_eq!(config.log.level, "info");
    }
}
