//! Process configuration resolved once at start-up.
//!
//! The entry point builds a [`Settings`] value from the invocation arguments
//! and the environment registry, then hands it by reference to every page
//! object and API helper.

pub mod environment;
pub mod settings;
pub mod timing;

use std::path::PathBuf;
use thiserror::Error;

pub use environment::{EnvironmentDescriptor, EnvironmentRegistry};
pub use settings::{Credentials, Overrides, Settings};
pub use timing::TimingPolicy;

/// Configuration failures. All of them are fatal at start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "expected {expected} invocation arguments (environment, headless flag, mode), found {found}"
    )]
    MissingArguments { expected: usize, found: usize },

    #[error("unknown environment '{name}' (registered: {})", .known.join(", "))]
    UnknownEnvironment { name: String, known: Vec<String> },

    #[error("failed to read environment registry {}: {source}", .path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse environment registry {}: {source}", .path.display())]
    RegistryParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid timing knob {name}={value}: must be a non-negative number")]
    InvalidTiming { name: &'static str, value: String },
}
