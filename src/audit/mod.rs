//! Audit Module
//!
//! Produces the audit trail the core owes its collaborators: one record per
//! completed recompute and one per rule- or catalog-driven action. Where the
//! records end up is the sink implementation's concern; the bundled sink is a
//! bounded in-memory ring served on `/audit`.

pub mod handlers;
pub mod sink;
