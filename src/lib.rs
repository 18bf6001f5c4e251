//! Ledger-backed membership record service.
//!
//! Keeps academy membership records (members, belt ranks, attendance, fee
//! status) as objects on a remote Move-object ledger node. The crate covers
//! the ledger interaction layer: credential loading and signing, typed
//! transaction construction, submission and confirmation classification,
//! object reads, and the event-log listing projection. HTTP routing, photo
//! storage and the UI live outside this crate and consume
//! [`records::MembershipService`].

/// Environment-driven service configuration
pub mod config;
/// Keystore credential loading and signing
pub mod credential;
/// JSON-RPC client for the ledger node
pub mod ledger;
/// Domain model, facade and listing projection
pub mod records;
/// Typed transaction intents and builders
pub mod transaction;
/// Formatting helpers
pub mod utils;
