pub mod api;
pub mod config;
pub mod driver;
pub mod pages;
pub mod report;
pub mod runner;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export common items
pub use config::Settings;
pub use runner::run_suite;
pub use session::{AuthenticatedClient, SessionSnapshot};
