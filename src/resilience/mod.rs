//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Blocking external call (SMTP send):
//!     → timeouts.rs (run on a worker thread, race against a deadline)
//!     → value, or Elapsed once the deadline passes
//! ```
//!
//! # Design Decisions
//! - Every blocking external call has a deadline
//! - No retries: a failed call is reported to the caller as-is

pub mod timeouts;
