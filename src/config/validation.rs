//! Configuration validation and interval resolution.
//!
//! # Responsibilities
//! - Turn a raw [`Config`] into [`Settings`] the poll loop can use
//! - Parse the polled URL
//! - Enforce the minimum and maximum poll interval
//!
//! # Design Decisions
//! - One resolver, one explicit [`IntervalPolicy`] per process
//! - Validation is a pure function: `Config → Result<Settings, ConfigError>`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::{Config, MailConfig};

/// Shortest poll interval a configuration file may resolve to.
pub const MIN_INTERVAL: Duration = Duration::from_secs(10);

/// Longest poll interval a configuration file may resolve to.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// What to do with an interval below [`MIN_INTERVAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalPolicy {
    /// Raise the interval to the minimum.
    #[default]
    Clamp,
    /// Refuse the configuration.
    Reject,
}

/// Error for an unrecognised policy name.
#[derive(Debug, Error)]
#[error("unknown interval policy '{0}', expected 'clamp' or 'reject'")]
pub struct UnknownPolicy(String);

impl FromStr for IntervalPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(IntervalPolicy::Clamp),
            "reject" => Ok(IntervalPolicy::Reject),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for IntervalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalPolicy::Clamp => write!(f, "clamp"),
            IntervalPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Resolved, validated configuration used by the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Resource checked for the sentinel.
    pub url: Url,
    /// Mail to send once the sentinel is seen.
    pub mail: MailConfig,
    /// Time between two fetches.
    pub interval: Duration,
}

/// Resolve a raw configuration under the given policy.
pub fn resolve(config: &Config, policy: IntervalPolicy) -> Result<Settings, ConfigError> {
    let url = Url::parse(&config.url).map_err(|source| ConfigError::Url {
        url: config.url.clone(),
        source,
    })?;

    let requested = config
        .cycle_length
        .checked_mul(config.cycle_unit.as_secs())
        .map(Duration::from_secs)
        .filter(|requested| *requested <= MAX_INTERVAL)
        .ok_or(ConfigError::IntervalTooLong {
            length: config.cycle_length,
            unit: config.cycle_unit,
            max: MAX_INTERVAL,
        })?;
    let interval = enforce_minimum(requested, policy)?;

    Ok(Settings {
        url,
        mail: config.mail.clone(),
        interval,
    })
}

fn enforce_minimum(requested: Duration, policy: IntervalPolicy) -> Result<Duration, ConfigError> {
    if requested >= MIN_INTERVAL {
        return Ok(requested);
    }

    match policy {
        IntervalPolicy::Clamp => {
            tracing::warn!(
                requested = ?requested,
                minimum = ?MIN_INTERVAL,
                "Poll interval below minimum, clamping"
            );
            Ok(MIN_INTERVAL)
        }
        IntervalPolicy::Reject => Err(ConfigError::IntervalTooShort {
            got: requested,
            min: MIN_INTERVAL,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CycleUnit;

    fn config(length: u64, unit: CycleUnit) -> Config {
        Config {
            cycle_length: length,
            cycle_unit: unit,
            ..Config::default()
        }
    }

    #[test]
    fn test_default_resolves_to_ten_minutes() {
        let settings = resolve(&Config::default(), IntervalPolicy::Clamp).unwrap();
        assert_eq!(settings.interval, Duration::from_secs(600));
        assert_eq!(settings.url.as_str(), "http://www.example.net/path/dotfile");
        assert_eq!(settings.mail, MailConfig::default());
    }

    #[test]
    fn test_clamp_raises_short_intervals_to_floor() {
        for length in [0, 1, 5, 9] {
            let settings =
                resolve(&config(length, CycleUnit::Seconds), IntervalPolicy::Clamp).unwrap();
            assert_eq!(settings.interval, MIN_INTERVAL);
        }
        let settings = resolve(&config(0, CycleUnit::Minutes), IntervalPolicy::Clamp).unwrap();
        assert_eq!(settings.interval, MIN_INTERVAL);
    }

    #[test]
    fn test_floor_itself_is_accepted() {
        for policy in [IntervalPolicy::Clamp, IntervalPolicy::Reject] {
            let settings = resolve(&config(10, CycleUnit::Seconds), policy).unwrap();
            assert_eq!(settings.interval, MIN_INTERVAL);
        }
    }

    #[test]
    fn test_reject_refuses_short_intervals() {
        let err = resolve(&config(5, CycleUnit::Seconds), IntervalPolicy::Reject).unwrap_err();
        match err {
            ConfigError::IntervalTooShort { got, min } => {
                assert_eq!(got, Duration::from_secs(5));
                assert_eq!(min, MIN_INTERVAL);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_huge_cycle_is_refused() {
        for (length, unit) in [
            (u64::MAX, CycleUnit::Minutes),
            (1 << 60, CycleUnit::Minutes),
            (MAX_INTERVAL.as_secs() + 1, CycleUnit::Seconds),
        ] {
            match resolve(&config(length, unit), IntervalPolicy::Clamp) {
                Err(ConfigError::IntervalTooLong { length: got, max, .. }) => {
                    assert_eq!(got, length);
                    assert_eq!(max, MAX_INTERVAL);
                }
                other => panic!("expected IntervalTooLong, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_ceiling_itself_is_accepted() {
        let minutes = MAX_INTERVAL.as_secs() / 60;
        let settings =
            resolve(&config(minutes, CycleUnit::Minutes), IntervalPolicy::Reject).unwrap();
        assert_eq!(settings.interval, MAX_INTERVAL);
    }

    #[test]
    fn test_bad_url_is_reported() {
        let mut cfg = Config::default();
        cfg.url = "not a url".to_string();
        assert!(matches!(
            resolve(&cfg, IntervalPolicy::Clamp),
            Err(ConfigError::Url { .. })
        ));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("clamp".parse::<IntervalPolicy>().unwrap(), IntervalPolicy::Clamp);
        assert_eq!("reject".parse::<IntervalPolicy>().unwrap(), IntervalPolicy::Reject);
        assert!("maybe".parse::<IntervalPolicy>().is_err());
        assert_eq!(IntervalPolicy::Reject.to_string(), "reject");
    }
}
