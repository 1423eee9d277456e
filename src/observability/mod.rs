//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! Consumers:
//!     → ~/polldot.log (every line prefixed with the pid)
//!     → stderr (warnings and errors)
//! ```

pub mod logging;
