//!
//! Ledger node integration.
//!
//! The node owns all authoritative record state; this module is a
//! well-behaved client of its JSON-RPC protocol: transaction submission
//! with confirmation detail, single-object reads, and event-log queries.

/// JSON-RPC client and the [`client::LedgerApi`] trait seam
pub mod client;
/// Protocol types and the ledger error taxonomy
pub mod types;

pub use client::{LedgerApi, NodeClient};
pub use types::{ConfirmationResult, EventRecord, LedgerError, ObjectSnapshot};
