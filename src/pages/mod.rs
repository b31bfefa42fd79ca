//! Page objects for the StormX admin application
//!
//! Every page wraps a [`BasePage`], which binds the borrowed browser, the
//! settings and a bounded wait for the lifetime of one page interaction.

pub mod base;
pub mod dashboard;
pub mod login;
pub mod sso_login;
pub mod vouchers;

pub use base::BasePage;
pub use dashboard::DashboardPage;
pub use login::{LoginOutcome, LoginPage};
pub use sso_login::SsoLoginPage;
pub use vouchers::VoucherListingPage;
