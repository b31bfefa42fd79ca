use super::settings::MAX_EXPLICIT_WAIT;
use super::ConfigError;
use std::time::Duration;

/// Environment variable overriding [`TimingPolicy::scale_factor`]
pub const SCALE_FACTOR_ENV: &str = "STORMX_SLEEP_SCALE_FACTOR";
/// Environment variable overriding [`TimingPolicy::additional_seconds`]
pub const ADDITIONAL_SECONDS_ENV: &str = "STORMX_SLEEP_ADDITIONAL_SECONDS";

/// Global knobs turning a nominal wait into the actual one.
///
/// `actual = scale_factor * nominal + additional_seconds`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPolicy {
    pub scale_factor: f64,
    pub additional_seconds: f64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            additional_seconds: 0.0,
        }
    }
}

impl TimingPolicy {
    /// Build a policy, rejecting negative or non-finite knobs
    ///
    /// Knobs that would stretch the explicit wait bound past what a
    /// [`Duration`] can hold are rejected too.
    pub fn new(scale_factor: f64, additional_seconds: f64) -> Result<Self, ConfigError> {
        check_knob(SCALE_FACTOR_ENV, scale_factor)?;
        check_knob(ADDITIONAL_SECONDS_ENV, additional_seconds)?;
        let policy = Self {
            scale_factor,
            additional_seconds,
        };
        if policy.try_scale(MAX_EXPLICIT_WAIT).is_none() {
            let (name, value) =
                if scale_factor * MAX_EXPLICIT_WAIT.as_secs_f64() > additional_seconds {
                    (SCALE_FACTOR_ENV, scale_factor)
                } else {
                    (ADDITIONAL_SECONDS_ENV, additional_seconds)
                };
            return Err(ConfigError::InvalidTiming {
                name,
                value: value.to_string(),
            });
        }
        Ok(policy)
    }

    /// Read the knobs from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(SCALE_FACTOR_ENV).ok().as_deref(),
            std::env::var(ADDITIONAL_SECONDS_ENV).ok().as_deref(),
        )
    }

    /// Build a policy from optional raw string values
    pub fn from_values(
        scale_factor: Option<&str>,
        additional_seconds: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let scale = match scale_factor {
            Some(raw) => parse_knob(SCALE_FACTOR_ENV, raw)?,
            None => defaults.scale_factor,
        };
        let additional = match additional_seconds {
            Some(raw) => parse_knob(ADDITIONAL_SECONDS_ENV, raw)?,
            None => defaults.additional_seconds,
        };
        Self::new(scale, additional)
    }

    /// Apply the policy to a nominal duration, saturating at [`Duration::MAX`]
    pub fn scale(&self, nominal: Duration) -> Duration {
        self.try_scale(nominal).unwrap_or(Duration::MAX)
    }

    fn try_scale(&self, nominal: Duration) -> Option<Duration> {
        let secs = self.scale_factor * nominal.as_secs_f64() + self.additional_seconds;
        Duration::try_from_secs_f64(secs.max(0.0)).ok()
    }

    /// Sleep for the scaled equivalent of `nominal`
    pub async fn sleep(&self, nominal: Duration) {
        let actual = self.scale(nominal);
        log::trace!("sleeping {:?} (nominal {:?})", actual, nominal);
        tokio::time::sleep(actual).await;
    }
}

fn parse_knob(name: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidTiming {
            name,
            value: raw.to_string(),
        })
}

fn check_knob(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTiming {
            name,
            value: value.to_string(),
        })
    }
}
