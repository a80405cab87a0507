//! Shelfrank Retail Ranking Engine Library
//!
//! This library crate defines the core modules of the ranking service.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`catalog`**: The product catalog and interaction-event store. Feeds the
//!   scorer through a single pure feature-extraction step and aggregates the
//!   KPI metrics surfaced on the dashboard API.
//! - **`rules`**: Operator override rules (pin/boost/demote/remove) with item
//!   or category scope and optional expiry.
//! - **`scoring`**: The pluggable desirability scorer behind a trait object:
//!   an in-process linear model by default, or a remote HTTP backend.
//! - **`ranking`**: The core engine. Applies the rule overlay to raw scores,
//!   produces immutable ranked snapshots with rank-change deltas, and serves
//!   them from an atomically-swapped cache.
//! - **`scheduler`**: The recompute driver. Coalesces periodic ticks and
//!   event triggers so at most one recompute is ever in flight.
//! - **`broadcast`**: WebSocket fan-out of compact snapshot-changed
//!   notifications, tolerant of slow or vanished subscribers.
//!
//! The `audit` module records one entry per completed recompute and per
//! operator action; `error` holds the recompute failure taxonomy.

pub mod audit;
pub mod broadcast;
pub mod catalog;
pub mod error;
pub mod ranking;
pub mod rules;
pub mod scheduler;
pub mod scoring;
