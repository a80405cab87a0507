//! Ranking Module
//!
//! The core of the service: turns raw machine scores plus operator rules into
//! the ordered, delta-annotated list consumers read.
//!
//! ## Overview
//! Each recompute produces a brand-new immutable [`types::Snapshot`]; nothing
//! is ever edited in place. The engine itself is a pure function, so every
//! ordering guarantee is unit-testable without spinning up the service. The
//! cache is the only point where a snapshot becomes visible, and it swaps
//! snapshots wholesale: a reader sees the previous list or the new one, never
//! a mixture.
//!
//! ## Submodules
//! - **`engine`**: The rule-overlay and ranking algorithm.
//! - **`cache`**: Atomic publish/read of the current snapshot.
//! - **`handlers`**: Read API (`/rankings`) and the price what-if endpoint.
//! - **`types`**: Snapshot data model.

pub mod cache;
pub mod engine;
pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;
