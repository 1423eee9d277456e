//! Configuration schema definitions.
//!
//! The on-disk configuration is a single flat JSON object. Field names are
//! part of the file format and must stay stable across releases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration as stored in `~/.polldot.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// The resource to retrieve and check for the sentinel.
    #[serde(rename = "url")]
    pub url: String,

    /// Mail sent once the sentinel shows up.
    #[serde(flatten)]
    pub mail: MailConfig,

    /// Number of `cycle_unit`s between two fetches.
    #[serde(rename = "cycle.length")]
    pub cycle_length: u64,

    /// Unit for `cycle_length`.
    #[serde(rename = "cycle.unit")]
    pub cycle_unit: CycleUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "http://www.example.net/path/dotfile".to_string(),
            mail: MailConfig::default(),
            cycle_length: 10,
            cycle_unit: CycleUnit::Minutes,
        }
    }
}

/// Mail settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    #[serde(rename = "mail.from")]
    pub from: String,

    #[serde(rename = "mail.to")]
    pub to: String,

    #[serde(rename = "mail.subject")]
    pub subject: String,

    #[serde(rename = "mail.body")]
    pub body: String,

    /// Mailserver hostname.
    #[serde(rename = "mail.host")]
    pub host: String,

    /// Mailserver port.
    #[serde(rename = "mail.port")]
    pub port: u16,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: "from@some.host.net".to_string(),
            to: "to@another.host.org".to_string(),
            subject: "subject text".to_string(),
            body: "Contents\nof the mail body.\n".to_string(),
            host: "smtp.mailserver.org".to_string(),
            port: 25,
        }
    }
}

/// Unit of the poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleUnit {
    Seconds,
    Minutes,
}

impl CycleUnit {
    /// Length of one unit in seconds.
    pub fn as_secs(self) -> u64 {
        match self {
            CycleUnit::Seconds => 1,
            CycleUnit::Minutes => 60,
        }
    }
}

impl fmt::Display for CycleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleUnit::Seconds => write!(f, "seconds"),
            CycleUnit::Minutes => write!(f, "minutes"),
        }
    }
}
