use super::{ConfigError, EnvironmentDescriptor, EnvironmentRegistry, TimingPolicy};
use chrono::NaiveDateTime;
use std::fmt;
use std::time::Duration;

/// Number of positional invocation arguments the resolver needs
pub const REQUIRED_ARGS: usize = 3;

/// Upper bound for explicit waits before the timing policy is applied
pub const MAX_EXPLICIT_WAIT: Duration = Duration::from_secs(10);

/// Path appended to the base URL to end a session
pub const LOGOUT_SUFFIX: &str = "/admin/index.php?logout=true";

/// Path that no page answers to, used by the 404 checks
pub const INVALID_URL_PARAMS: &str = "/ABC/123";

/// Before this local hour, inventory is booked against the previous day
pub const BOOKING_PREVIOUS_DAY_INVENTORY_HOUR: u32 = 5;

/// Identity provider used when neither `URL` nor the registry provides one
pub const DEFAULT_IDP_URL: &str =
    "http://192.168.56.103/simplesaml/saml2/idp/SSOService.php?spentityid=stormx-sp";

/// Environment variable overriding the identity provider URL
pub const IDP_URL_ENV: &str = "URL";
pub const USERNAME_ENV: &str = "STORMX_USERNAME";
pub const PASSWORD_ENV: &str = "STORMX_PASSWORD";

/// Login used by the smoke cases
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "support".to_string(),
            password: "test".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            username: std::env::var(USERNAME_ENV).unwrap_or(defaults.username),
            password: std::env::var(PASSWORD_ENV).unwrap_or(defaults.password),
        }
    }
}

/// Values taken from the process environment rather than the arguments
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub idp_url: Option<String>,
    pub timing: TimingPolicy,
    pub credentials: Credentials,
}

impl Overrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            idp_url: std::env::var(IDP_URL_ENV).ok(),
            timing: TimingPolicy::from_env()?,
            credentials: Credentials::from_env(),
        })
    }
}

/// Resolved configuration for one process
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub environment: EnvironmentDescriptor,
    pub base_url: String,
    pub idp_url: String,
    pub logout_url: String,
    pub headless: bool,
    pub sso_enabled: bool,
    pub mode: String,
    pub max_explicit_wait: Duration,
    pub timing: TimingPolicy,
    pub invalid_url_params: String,
    pub booking_previous_day_inventory_hour: u32,
    pub credentials: Credentials,
}

impl Settings {
    /// Resolve settings from `[env_name, headless_flag, mode, ...]`
    ///
    /// Extra trailing arguments are ignored.
    pub fn resolve<S: AsRef<str>>(
        args: &[S],
        registry: &EnvironmentRegistry,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        if args.len() < REQUIRED_ARGS {
            return Err(ConfigError::MissingArguments {
                expected: REQUIRED_ARGS,
                found: args.len(),
            });
        }

        let environment = registry.lookup(args[0].as_ref())?.clone();
        let headless = parse_headless_flag(args[1].as_ref());
        let mode = args[2].as_ref().to_string();
        let sso_enabled = parse_sso_mode(&mode);

        let base_url = environment.php_host.clone();
        let logout_url = format!("{}{}", base_url, LOGOUT_SUFFIX);
        let idp_url = overrides
            .idp_url
            .or_else(|| environment.idp_url.clone())
            .unwrap_or_else(|| DEFAULT_IDP_URL.to_string());

        Ok(Self {
            environment,
            base_url,
            idp_url,
            logout_url,
            headless,
            sso_enabled,
            mode,
            max_explicit_wait: MAX_EXPLICIT_WAIT,
            timing: overrides.timing,
            invalid_url_params: INVALID_URL_PARAMS.to_string(),
            booking_previous_day_inventory_hour: BOOKING_PREVIOUS_DAY_INVENTORY_HOUR,
            credentials: overrides.credentials,
        })
    }

    /// Timeout used by bounded waits, after the timing policy
    pub fn explicit_wait_timeout(&self) -> Duration {
        self.timing.scale(self.max_explicit_wait)
    }

    /// URL that should land on the 404 page
    pub fn invalid_url(&self) -> String {
        format!("{}{}", self.base_url, self.invalid_url_params)
    }

    /// Base URL of the REST API, if configured
    pub fn api_host(&self) -> Option<&str> {
        self.environment.host.as_deref()
    }

    /// Event time for an inventory booking made at `now`
    ///
    /// Uses the configured previous-day cutoff hour.
    pub fn inventory_event_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        crate::utils::fixtures::inventory_event_time(now, self.booking_previous_day_inventory_hour)
    }
}

/// Headless unless the flag is exactly `false` (any case, no padding)
pub fn parse_headless_flag(value: &str) -> bool {
    !value.eq_ignore_ascii_case("false")
}

/// SSO mode iff the mode string mentions `sso` (any case)
pub fn parse_sso_mode(mode: &str) -> bool {
    mode.to_lowercase().contains("sso")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EnvironmentRegistry {
        let mut registry = EnvironmentRegistry::default();
        registry.insert(EnvironmentDescriptor::new("local", "http://192.168.56.101"));
        registry.insert(
            EnvironmentDescriptor::new("qa", "https://qaui.example.com")
                .with_api_host("https://qaapi.example.com")
                .with_idp_url("https://idp.example.com/login"),
        );
        registry
    }

    #[test]
    fn test_resolve_derives_urls() {
        let settings =
            Settings::resolve(&["local", "true", "standard"], &registry(), Overrides::default())
                .unwrap();

        assert_eq!(settings.base_url, "http://192.168.56.101");
        assert_eq!(
            settings.logout_url,
            "http://192.168.56.101/admin/index.php?logout=true"
        );
        assert_eq!(settings.idp_url, DEFAULT_IDP_URL);
        assert_eq!(settings.max_explicit_wait, Duration::from_secs(10));
        assert_eq!(settings.timing, TimingPolicy::default());
        assert_eq!(settings.invalid_url(), "http://192.168.56.101/ABC/123");
        assert!(settings.api_host().is_none());
    }

    #[test]
    fn test_logout_url_is_plain_concatenation() {
        let mut registry = EnvironmentRegistry::default();
        registry.insert(EnvironmentDescriptor::new("slash", "https://ui.example.com/"));
        let settings =
            Settings::resolve(&["slash", "true", "x"], &registry, Overrides::default()).unwrap();
        assert_eq!(
            settings.logout_url,
            "https://ui.example.com//admin/index.php?logout=true"
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let registry = registry();
        let args = ["qa", "false", "sso"];
        let first = Settings::resolve(&args, &registry, Overrides::default()).unwrap();
        let second = Settings::resolve(&args, &registry, Overrides::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.idp_url, "https://idp.example.com/login");
        assert_eq!(first.api_host(), Some("https://qaapi.example.com"));
    }

    #[test]
    fn test_idp_override_wins() {
        let overrides = Overrides {
            idp_url: Some("http://override/idp".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(&["qa", "true", "sso"], &registry(), overrides).unwrap();
        assert_eq!(settings.idp_url, "http://override/idp");
    }

    #[test]
    fn test_missing_arguments() {
        let err = Settings::resolve(&["local", "true"], &registry(), Overrides::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingArguments {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_unknown_environment() {
        let err = Settings::resolve(&["superman", "true", "all"], &registry(), Overrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment { .. }));
    }

    #[test]
    fn test_headless_flag() {
        assert!(parse_headless_flag("true"));
        assert!(parse_headless_flag("TRUE"));
        assert!(parse_headless_flag("no"));
        assert!(parse_headless_flag(""));
        assert!(!parse_headless_flag("false"));
        assert!(!parse_headless_flag("False"));
        assert!(!parse_headless_flag("FALSE"));
    }

    #[test]
    fn test_padded_false_stays_headless() {
        assert!(parse_headless_flag(" false"));
        assert!(parse_headless_flag("false "));
        assert!(parse_headless_flag("false\n"));
    }

    #[test]
    fn test_sso_mode() {
        assert!(parse_sso_mode("SSO-run"));
        assert!(parse_sso_mode("sso"));
        assert!(parse_sso_mode("with-Sso"));
        assert!(!parse_sso_mode("standard"));
        assert!(!parse_sso_mode("all"));
    }

    #[test]
    fn test_explicit_wait_is_scaled() {
        let overrides = Overrides {
            timing: TimingPolicy::new(1.5, 1.0).unwrap(),
            ..Overrides::default()
        };
        let settings = Settings::resolve(&["local", "true", "x"], &registry(), overrides).unwrap();
        assert_eq!(settings.explicit_wait_timeout(), Duration::from_secs(16));
    }

    #[test]
    fn test_inventory_event_time_follows_cutoff_setting() {
        use chrono::NaiveDate;

        let mut settings =
            Settings::resolve(&["local", "true", "x"], &registry(), Overrides::default()).unwrap();
        let early = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(4, 30, 0)
            .unwrap();
        let previous_day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(settings.inventory_event_time(early).date(), previous_day);

        settings.booking_previous_day_inventory_hour = 3;
        assert_eq!(
            settings.inventory_event_time(early).date(),
            early.date()
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::default());
        assert!(rendered.contains("support"));
        assert!(!rendered.contains("\"test\""));
    }
}
