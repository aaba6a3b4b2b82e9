//! Luna core crate - configuration, error taxonomy, and shared domain types.
//!
//! Everything the other Luna crates agree on lives here: the message and
//! session vocabulary of the chat widget, the sectioned TOML configuration,
//! and the top-level error type that subsystem errors convert into.

pub mod config;
pub mod error;
pub mod types;

pub use config::LunaConfig;
pub use error::{LunaError, Result};
pub use types::*;
