pub mod api;
pub mod commands;
pub mod config;
pub mod http;

/// Version of this client library, as reported in the user agent.
pub const VERSION: &str = env!("STRATUS_VERSION");

/// Version of the platform API protocol spoken by this client, sent
/// with every request.
pub const API_VERSION: &str = "1.0.0";
