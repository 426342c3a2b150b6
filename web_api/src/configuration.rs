//! configuration.rs
//!
//! configuration.yaml, overridden by APP__* environment variables

use common_lib::common_structs::ConfigLocation;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application_host: String,
    pub application_port: u16,
    pub workers: usize,
    pub environment: String,
    pub tls: Option<TlsSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TlsSettings {
    pub cert_path: String,
    pub key_path: String,
}

impl Settings {
    pub fn address(&self) -> (String, u16) {
        (self.application_host.clone(), self.application_port)
    }
}

/// where configuration.yaml lives for this deployment
pub fn configuration_path(config_location: &ConfigLocation) -> String {
    match config_location {
        // corresponds to the Dockerfile "COPY web_api/configuration.yaml /app/configuration.yaml"
        ConfigLocation::Docker => "./configuration.yaml".to_string(),
        ConfigLocation::NotDocker => format!("{}/configuration.yaml", env!("CARGO_MANIFEST_DIR")),
    }
}

pub fn get_yaml_configuration() -> Result<Settings, ConfigError> {
    let path = configuration_path(&ConfigLocation::from_env());
    tracing::debug!("[get_yaml_configuration] reading {}", &path);
    build_settings(
        Config::builder().add_source(File::new(&path, FileFormat::Yaml).required(false)),
        app_environment(),
    )
}

/// APP__APPLICATION_PORT=9000 overrides application_port
fn app_environment() -> Environment {
    Environment::with_prefix("APP").separator("__").try_parsing(true)
}

fn build_settings(builder: config::ConfigBuilder<config::builder::DefaultState>, environment: Environment) -> Result<Settings, ConfigError> {
    builder
        .set_default("application_host", "0.0.0.0")?
        .set_default("application_port", 8080)?
        .set_default("workers", 2)?
        .set_default("environment", "development")?
        .add_source(environment)
        .build()?
        .try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    /// APP__* variables from a fixed map instead of the process environment
    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        app_environment().source(Some(map))
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = build_settings(Config::builder(), env_from(&[])).unwrap();
        assert_eq!(settings.application_host, "0.0.0.0");
        assert_eq!(settings.application_port, 8080);
        assert_eq!(settings.workers, 2);
        assert_eq!(settings.environment, "development");
        assert!(settings.tls.is_none());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
application_port: 9443
environment: "production"
tls:
  cert_path: "cert.pem"
  key_path: "key.pem"
"#;
        let settings = build_settings(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)), env_from(&[])).unwrap();
        assert_eq!(settings.application_port, 9443);
        assert_eq!(settings.environment, "production");
        assert_eq!(settings.address(), ("0.0.0.0".to_string(), 9443));
        let tls = settings.tls.unwrap();
        assert_eq!(tls.cert_path, "cert.pem");
        assert_eq!(tls.key_path, "key.pem");
    }

    #[test]
    fn test_shipped_configuration_file_parses() {
        let path = configuration_path(&ConfigLocation::NotDocker);
        let settings = build_settings(Config::builder().add_source(File::new(&path, FileFormat::Yaml)), env_from(&[])).unwrap();
        assert_eq!(settings.application_port, 8080);
    }

    #[test]
    fn test_environment_overrides_yaml() {
        let yaml = r#"
application_port: 9443
environment: "production"
"#;
        let env = env_from(&[("APP__APPLICATION_PORT", "9000"), ("APP__WORKERS", "8"), ("OTHER__ENVIRONMENT", "ignored")]);
        let settings = build_settings(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)), env).unwrap();
        assert_eq!(settings.application_port, 9000);
        assert_eq!(settings.workers, 8);
        assert_eq!(settings.environment, "production");
    }
}
