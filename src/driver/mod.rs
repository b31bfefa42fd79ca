pub mod actions;
pub mod traits;
pub mod wait;
pub mod web;

#[cfg(test)]
pub(crate) mod fake;

pub use actions::{Action, Actions};
pub use traits::{BrowserCookie, BrowserSession, Selector};
pub use wait::{BoundedWait, Presence, WaitError};
pub use web::{PlaywrightBrowser, WebBrowserConfig};
