//! polldot: poll a URL for a '.' and send one mail when it shows up.

pub mod config;
pub mod lifecycle;
pub mod mail;
pub mod observability;
pub mod poller;
pub mod resilience;

pub use config::{Config, ConfigStore, Settings};
pub use lifecycle::control::channel;
pub use poller::{Outcome, PollLoop};
