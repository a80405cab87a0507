//! Recompute Scheduler Module
//!
//! Drives every ranking recompute in the system. A periodic timer and all
//! event triggers (inventory changes, rule edits, price simulations, manual
//! requests) feed one coalescing path, and at most one recompute is ever in
//! flight: triggers that arrive during a run are folded into a single
//! follow-up run instead of queueing one run each.
//!
//! ## Failure policy
//! A failed run (scorer unavailable or timed out) is logged and counted,
//! publishes nothing — readers keep the last good snapshot — and the loop
//! simply returns to waiting. The next tick or trigger is the retry; there is
//! no tight retry loop.
//!
//! ## Submodules
//! - **`service`**: The scheduler state machine and recompute pipeline.
//! - **`handlers`**: Trigger endpoint and service health.
//! - **`types`**: Trigger reasons and configuration.

pub mod handlers;
pub mod service;
pub mod types;
