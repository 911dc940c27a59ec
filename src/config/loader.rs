//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DestinationConfig, LogFormat};

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.routes.len(), 3);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn parses_full_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:8080"

            [timeouts]
            upstream_secs = 2

            [observability]
            log_format = "json"

            [[routes]]
            name = "api"
            prefix = "/api"
            strip_prefix = true
            destination = { kind = "local", address = "127.0.0.1:3000" }

            [[routes]]
            name = "docs"
            prefix = "/docs"
            destination = { kind = "remote", origin = "https://docs.example.com" }

            [default_route]
            destination = { kind = "literal", body = "nothing at {path}" }
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.timeouts.upstream_secs, 2);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].strip_prefix, Some(true));
        assert_eq!(config.routes[1].strip_prefix, None);
        assert_eq!(config.default_route.name, "default");
        assert_eq!(
            config.default_route.destination,
            DestinationConfig::Literal { body: "nothing at {path}".into() }
        );
    }

    #[test]
    fn unknown_destination_kind_is_parse_error() {
        let err = parse_config(
            r#"
            [[routes]]
            name = "x"
            prefix = "/x"
            destination = { kind = "ftp", address = "a:1" }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_address_is_validation_error() {
        let err = parse_config(
            r#"
            [[routes]]
            name = "node"
            prefix = "/node"
            destination = { kind = "local", address = "localhost" }
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
