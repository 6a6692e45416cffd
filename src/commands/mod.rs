//! CLI subcommand implementations.

mod api;
mod describe;
mod env;

pub use api::api;
pub use describe::describe;
pub use env::env;
