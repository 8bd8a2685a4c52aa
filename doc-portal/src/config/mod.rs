use portal_core::error::AppError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    /// Base URL of the document backend, without a trailing slash.
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP/gRPC collector endpoint. Span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()?;

    // Allow running from the workspace root or from inside doc-portal/
    let configuration_directory = if base_path.ends_with("doc-portal") {
        base_path.join("config")
    } else {
        base_path.join("doc-portal").join("config")
    };

    load_from(&configuration_directory)
}

/// Read `base.yaml` from `directory`, then overlay `APP_`-prefixed
/// environment variables (`APP_BACKEND__URL=http://...`).
pub fn load_from(directory: &Path) -> Result<Settings, AppError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings = settings.try_deserialize::<Settings>()?;
    settings.backend.url = settings.backend.url.trim_end_matches('/').to_string();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_base_config_loads() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let settings = load_from(&directory).expect("base.yaml should deserialize");

        assert!(!settings.backend.url.ends_with('/'));
        assert!(settings.backend.timeout_secs > 0);
        assert!(settings.server.port > 0);
    }

    #[test]
    fn telemetry_defaults_to_info_without_export() {
        let telemetry = TelemetrySettings::default();
        assert_eq!(telemetry.log_level, "info");
        assert!(telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn missing_config_directory_is_a_config_error() {
        let err = load_from(Path::new("/nonexistent/doc-portal/config")).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
