use std::path::{Path, PathBuf};

use common::utils::file::resolve_path;
use config::{Config, Environment, File};
use thiserror::Error;

use crate::types::ClientConfig;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "CHAT_DESK";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file found (tried {0})")]
    NotFound(String),

    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Candidate locations when no path is given on the command line.
fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("Config.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("chat-desk").join("Config.toml"));
    }
    paths
}

fn locate_config(path: Option<&str>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return resolve_path(path).map_err(|_| ConfigError::NotFound(path.to_string()));
    }

    let candidates = default_locations();
    candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
        .ok_or_else(|| {
            let tried: Vec<String> = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            ConfigError::NotFound(tried.join(", "))
        })
}

/// Loads the console configuration from `path` (or the default locations),
/// overlaid with `CHAT_DESK_*` environment variables.
pub fn parse_client_config(path: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let path = locate_config(path)?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    let cfg = Config::builder()
        .add_source(File::from(path))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;

    let config: ClientConfig = cfg.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("endpoint must not be empty".into()));
    }
    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "endpoint must be an http(s) URL, got {}",
            config.endpoint
        )));
    }
    if config.nonce.trim().is_empty() {
        return Err(ConfigError::Invalid("nonce must not be empty".into()));
    }
    if config.poll_interval_secs == 0 || config.dashboard_interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "poll and dashboard intervals must be at least one second".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn fills_in_defaults() {
        let file = write_config(
            r#"
            endpoint = "https://shop.test/wp-admin/admin-ajax.php"
            nonce = "abc123"
            "#,
        );

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.operator_name, "Operator");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.dashboard_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(config.sound);
    }

    #[test]
    fn reads_overrides_from_file() {
        let file = write_config(
            r#"
            endpoint = "http://localhost:8080/ajax"
            nonce = "abc123"
            poll_interval_secs = 2
            sound = false
            "#,
        );

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.poll_interval_secs, 2);
        assert!(!config.sound);
    }

    #[test]
    fn rejects_missing_nonce() {
        let file = write_config(r#"endpoint = "https://shop.test/ajax""#);
        assert!(matches!(load_from(file.path()), Err(ConfigError::Load(_))));
    }

    #[test]
    fn rejects_zero_intervals() {
        let file = write_config(
            r#"
            endpoint = "https://shop.test/ajax"
            nonce = "abc123"
            poll_interval_secs = 0
            "#,
        );
        assert!(matches!(load_from(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_non_http_endpoints() {
        let file = write_config(
            r#"
            endpoint = "ftp://shop.test"
            nonce = "abc123"
            "#,
        );
        assert!(matches!(load_from(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn explicit_missing_path_is_not_found() {
        assert!(matches!(
            parse_client_config(Some("/no/such/Config.toml")),
            Err(ConfigError::NotFound(_))
        ));
    }
}
