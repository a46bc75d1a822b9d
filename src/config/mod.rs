mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{NodeSettings, ServerSettings, Settings};

/// Loads the configuration from the default file and environment variables.
/// Merges the configuration with default values.
/// Returns a `Settings` struct containing the server and node configurations.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        node: NodeSettings {
            first_message_bypass: partial
                .node
                .as_ref()
                .and_then(|n| n.first_message_bypass)
                .unwrap_or(default.node.first_message_bypass),
            bypass_interval_ms: partial
                .node
                .as_ref()
                .and_then(|n| n.bypass_interval_ms)
                .unwrap_or(default.node.bypass_interval_ms),
        },
    })
}

#[cfg(test)]
mod tests;
