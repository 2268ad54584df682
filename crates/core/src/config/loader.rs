//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// File names searched in the working directory, in order
const LOCAL_CANDIDATES: &[&str] = &[".knocker.toml", "knocker.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or discover one.
    ///
    /// An explicit path must exist. Without one, the working directory is
    /// searched first, then `<config dir>/knocker/config.toml`; when nothing
    /// is found the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(Path::new(".")),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }
}

/// Find a configuration file starting from `dir`
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    LOCAL_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .chain(dirs::config_dir().map(|d| d.join("knocker").join("config.toml")))
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::ErrorCode;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.telemetry.log_level, "warn");
        assert_eq!(config.schema.cli.format, OutputFormat::Text);
        assert!(config.schema.api.timeout_secs.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "http://localhost:8000/api"

            [cli]
            default_team = "175928847299117063"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.schema.api.base_url.as_deref(),
            Some("http://localhost:8000/api")
        );
        assert_eq!(config.schema.cli.format, OutputFormat::Json);
        assert_eq!(config.schema.telemetry.log_level, "warn");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".knocker.toml");
        std::fs::write(&path, "[api]\ntimeout_secs = 15\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.schema.api.timeout_secs, Some(15));
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/knocker.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knocker.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);
        assert!(err.context.unwrap().contains("Failed to parse config file"));
    }

    #[test]
    fn test_discovery_prefers_dotfile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("knocker.toml"), "").unwrap();
        std::fs::write(dir.path().join(".knocker.toml"), "").unwrap();

        let found = find_config_file(dir.path()).unwrap();
        assert!(found.ends_with(".knocker.toml"));
    }
}
