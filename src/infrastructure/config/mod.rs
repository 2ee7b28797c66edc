use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::{AppError, Result};

/// Environment variable prefix, e.g. `PLOTSHEET_PORT=9000`
pub const ENV_PREFIX: &str = "PLOTSHEET_";

/// Config file read when `PLOTSHEET_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "plotsheet.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Directory holding generated chart images
    #[validate(custom(function = "validate_plot_dir"))]
    pub plot_dir: PathBuf,
    /// Prefix of the download links returned to clients
    #[validate(url)]
    pub public_base_url: String,
    /// Upper bound for a multipart upload, in bytes
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
    /// Chart pixel density multiplier (1.0 = 640x480)
    #[validate(range(min = 0.1, max = 8.0))]
    pub plot_scale: f32,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            plot_dir: PathBuf::from("plots"),
            public_base_url: "http://127.0.0.1:8000".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            plot_scale: 1.0,
            log_filter: "info".to_string(),
            cors_permissive: true,
        }
    }
}

fn validate_plot_dir(dir: &PathBuf) -> std::result::Result<(), ValidationError> {
    if dir.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_plot_dir"));
    }
    Ok(())
}

impl ServerConfig {
    /// Defaults, then the TOML file, then `PLOTSHEET_*` variables.
    pub fn load() -> Result<Self> {
        let path = std::env::var("PLOTSHEET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let figment = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ServerConfig = figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Link to one stored chart
    pub fn plot_url(&self, plot_name: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(plot_name.as_bytes()).collect();
        format!("{}/download-plot/?plot_name={}", self.base_url(), encoded)
    }

    /// Link to the archive of every stored chart
    pub fn download_all_url(&self) -> String {
        format!("{}/download-all-plots/", self.base_url())
    }

    fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::from_figment(defaults()).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.plot_dir, PathBuf::from("plots"));
        assert_eq!(config.bind_addr(), ("127.0.0.1".to_string(), 8000));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = defaults().merge(Toml::string(
            r#"
            port = 9100
            plot_dir = "/tmp/charts"
            public_base_url = "https://charts.example.com/"
            "#,
        ));
        let config = ServerConfig::from_figment(figment).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.plot_dir, PathBuf::from("/tmp/charts"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(
            config.download_all_url(),
            "https://charts.example.com/download-all-plots/"
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_port = defaults().merge(Toml::string("port = 0"));
        assert!(matches!(
            ServerConfig::from_figment(zero_port),
            Err(AppError::ValidationError(_))
        ));

        let bad_url = defaults().merge(Toml::string(r#"public_base_url = "not a url""#));
        assert!(ServerConfig::from_figment(bad_url).is_err());

        let empty_dir = defaults().merge(Toml::string(r#"plot_dir = """#));
        assert!(ServerConfig::from_figment(empty_dir).is_err());

        let wrong_type = defaults().merge(Toml::string(r#"port = "eighty""#));
        assert!(ServerConfig::from_figment(wrong_type).is_err());
    }

    #[test]
    fn test_plot_url_encodes_name() {
        let config = ServerConfig::default();
        assert_eq!(
            config.plot_url("A_line.png"),
            "http://127.0.0.1:8000/download-plot/?plot_name=A_line.png"
        );
        assert_eq!(
            config.plot_url("Sales & Cost_bar.png"),
            "http://127.0.0.1:8000/download-plot/?plot_name=Sales+%26+Cost_bar.png"
        );
    }
}
