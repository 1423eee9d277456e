//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ~/.polldot.json (JSON)
//!     → loader.rs (read & deserialize, write defaults if missing)
//!     → validation.rs (URL parsing, interval policy)
//!     → Settings (validated, immutable)
//!     → owned by the poll loop
//!
//! On reload request:
//!     poll loop calls loader.rs again
//!     → success: Settings replaced wholesale
//!     → failure: previous Settings kept
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigStore};
pub use schema::{Config, CycleUnit, MailConfig};
pub use validation::{IntervalPolicy, Settings, MAX_INTERVAL, MIN_INTERVAL};
