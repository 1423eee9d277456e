//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve paths → Init logging → Load config → Start signal listener → Run poll loop
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM/SIGUSR1 → quit request
//!     SIGHUP → reload request
//!
//! Requests (control.rs):
//!     single-slot channels, signal listener → poll loop
//! ```
//!
//! # Design Decisions
//! - Ordered startup: logging first, then config, then signals, then the loop
//! - The poll loop owns the receiving side; nothing else consumes requests

pub mod control;
pub mod signals;
pub mod startup;

pub use control::{Request, RequestSender, Requests};
pub use startup::{StartupError, StartupOptions};
