//! Runtime utilities
//!
//! This module is only used by the binaries and provides helper code related
//! to runtime configuration and logging setup.

mod config;
mod endpoint;
mod logging;

pub use config::Config;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable prefix for all configuration options
const ENV_PREFIX: &str = "GDC_MCP_";

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file(yaml_path))
        .extract()
}

/// Set up logging from the provided configuration options.
///
/// Returns the file appender guard when file logging is active; the guard
/// must be held for the lifetime of the process.
pub fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>, anyhow::Error> {
    let env_filter = logging::Logging::env_filter(&config.logging)?;
    let (layer, guard) = logging::Logging::logging_layer(&config.logging)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .init();

    Ok(guard)
}

#[cfg(test)]
mod test {
    use super::read_config;

    #[test]
    fn it_prioritizes_env_vars() {
        let config = r#"
            endpoint: http://from_file:4000
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";
            let endpoint = "https://from_env:4000/";

            jail.create_file(path, config)?;
            jail.set_env("GDC_MCP_ENDPOINT", endpoint);

            let config = read_config(path)?;

            assert_eq!(config.endpoint.as_str(), endpoint);
            Ok(())
        });
    }

    #[test]
    fn it_extracts_nested_env() {
        let config = r#"
            logging:
                level: info
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GDC_MCP_LOGGING__LEVEL", "debug");

            let config = read_config(path)?;

            assert_eq!(config.logging.level, tracing::Level::DEBUG);
            Ok(())
        });
    }

    #[test]
    fn it_merges_env_and_file() {
        let config = "
            endpoint: http://from_file:4000/
        ";

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GDC_MCP_TRANSPORT__TYPE", "http");
            jail.set_env("GDC_MCP_TRANSPORT__PORT", "8000");

            let config = read_config(path)?;

            assert_eq!(config.endpoint.as_str(), "http://from_file:4000/");
            match config.transport {
                gdc_mcp_server::server::Transport::Http { port, .. } => assert_eq!(port, 8000),
                _ => panic!("expected http transport"),
            }
            Ok(())
        });
    }
}
