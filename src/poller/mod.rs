//! Polling subsystem.
//!
//! # Data Flow
//! ```text
//! signal listener ──(reload/quit requests)──┐
//!                                           ▼
//!                     poll_loop.rs (select: quit | reload | deadline)
//!                                           │ deadline
//!                                           ▼
//!                     fetch.rs (GET url, first byte == '.')
//!                                           │ sentinel seen
//!                                           ▼
//!                     mail (one send, 5s deadline) → Outcome
//! ```

pub mod fetch;
pub mod poll_loop;

pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use poll_loop::{Outcome, PollLoop};
