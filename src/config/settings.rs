use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for both the websocket host and the queue node itself.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub node: NodeSettings,
}

/// Configuration settings for the websocket host.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Construction-time settings for the queue node.
///
/// `first_message_bypass` is fixed for the node's lifetime;
/// `bypass_interval_ms` is only the starting value and can be retuned at
/// runtime through a `bypassInterval` control message.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
    pub first_message_bypass: bool,
    pub bypass_interval_ms: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled
/// using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub node: Option<PartialNodeSettings>,
}

/// Partial server settings.
///
/// Used when loading server configuration from external sources with
/// optional values.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial node settings.
///
/// Used for node configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialNodeSettings {
    pub first_message_bypass: Option<bool>,
    pub bypass_interval_ms: Option<u64>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is
/// provided: queue normally (no first-message bypass) and leave the bypass
/// timer disarmed until a control message sets an interval.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            node: NodeSettings {
                first_message_bypass: false,
                bypass_interval_ms: 0,
            },
        }
    }
}
