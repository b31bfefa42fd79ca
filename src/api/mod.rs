//! Plain-HTTP helpers for the StormX PHP application and REST API

pub mod stormx;

pub use stormx::{inject_session, ApiError, StormxApi};
