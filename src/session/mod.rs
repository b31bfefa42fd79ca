//! Browser-to-HTTP session bridge
//!
//! A [`SessionSnapshot`] is the cookie jar of a browser (or of an HTTP login
//! response) at one moment. An [`AuthenticatedClient`] is derived from a
//! snapshot and sends exactly those cookies with every request.

pub mod client;
pub mod snapshot;

pub use client::{AuthenticatedClient, BridgeError};
pub use snapshot::SessionSnapshot;
