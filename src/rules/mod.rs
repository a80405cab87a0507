//! Ranking Rules Module
//!
//! Operator-defined overrides layered on top of machine scores: pin an item to
//! the top, boost or demote it multiplicatively, or remove it from the list
//! entirely. Rules target a single item or a whole category and may carry an
//! expiry; an expired rule behaves exactly as if it were deleted.
//!
//! ## Submodules
//! - **`store`**: Concurrent rule storage with deterministic active-rule listing.
//! - **`handlers`**: HTTP admin endpoints (CRUD plus pin/boost shortcuts).
//! - **`types`**: Rule data model shared with the ranking engine.

pub mod handlers;
pub mod store;
pub mod types;
