//! Broadcast Module
//!
//! Fans out a compact notification to every connected subscriber each time a
//! new snapshot is published. Notifications carry aggregate KPIs and the
//! biggest rank movers, never the full snapshot, so message size stays
//! bounded no matter how large the catalog grows.
//!
//! Publishing never blocks on subscribers: the hub writes into a bounded
//! broadcast channel and moves on. A subscriber that falls behind the buffer
//! is disconnected rather than allowed to slow the publish path.
//!
//! ## Submodules
//! - **`hub`**: The broadcast channel wrapper shared by publisher and sessions.
//! - **`handlers`**: The `/ws` WebSocket endpoint and per-client session loop.
//! - **`types`**: Notification payload.

pub mod handlers;
pub mod hub;
pub mod types;

#[cfg(test)]
mod tests;
