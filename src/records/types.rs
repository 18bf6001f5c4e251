//! Domain types for membership records and the service-level error taxonomy.

use crate::credential::CredentialError;
use crate::ledger::types::LedgerError;
use crate::transaction::builder::BuildError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Belt rank of a member.
///
/// The set is fixed by the on-ledger contract; anything else is rejected
/// before a transaction is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    White,
    Blue,
    Purple,
    Brown,
    Black,
}

impl Rank {
    /// All ranks, in promotion order.
    pub const ALL: [Rank; 5] = [
        Rank::White,
        Rank::Blue,
        Rank::Purple,
        Rank::Brown,
        Rank::Black,
    ];

    /// Canonical lowercase form, as stored on the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::White => "white",
            Rank::Blue => "blue",
            Rank::Purple => "purple",
            Rank::Brown => "brown",
            Rank::Black => "black",
        }
    }

    /// Case-insensitive parse against the canonical forms.
    pub fn parse(value: &str) -> Option<Rank> {
        let lowered = value.trim().to_ascii_lowercase();
        Rank::ALL.iter().copied().find(|r| r.as_str() == lowered)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member record as materialized from a ledger object read.
///
/// This is a snapshot, not authoritative state: the ledger owns the record
/// and the snapshot reflects it only as of the read.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    /// Ledger-assigned object id. Never chosen by this service.
    pub id: String,
    /// Object version at the time of the read.
    pub version: u64,
    /// External identity token the member enrolled with.
    pub external_identity: String,
    /// Display name.
    pub name: String,
    /// Current belt rank.
    pub rank: Rank,
    /// Fee status: paid-up until this ledger timestamp (ms), 0 if never paid.
    pub fee_paid_until_ms: u64,
    /// Ledger timestamp of enrollment (ms).
    pub enrolled_at_ms: u64,
}

impl Member {
    /// Enrollment time as a UTC datetime, when the timestamp is representable.
    pub fn enrolled_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.enrolled_at_ms as i64)
    }

    /// Whether the membership fee covers the given instant.
    pub fn fee_active_at(&self, at: DateTime<Utc>) -> bool {
        (self.fee_paid_until_ms as i64) >= at.timestamp_millis()
    }
}

/// One entry of the listing projection, derived from an enrollment event.
///
/// Listing entries are append-derived and eventually consistent: a later
/// rank or fee change does not show here. Callers needing fresh state must
/// re-resolve the id through a record read.
#[derive(Debug, Clone, Serialize)]
pub struct ListingEntry {
    pub record_id: String,
    pub name: String,
    pub rank: Rank,
    /// Ledger emission timestamp of the enrollment event (ms), if reported.
    pub enrolled_at_ms: Option<u64>,
}

/// Result of a successful enrollment.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollReceipt {
    /// The new record's ledger-assigned id.
    pub record_id: String,
    /// Confirmation digest of the enrollment transaction.
    pub digest: String,
    /// Events emitted by the enrollment, as reported by the node.
    pub events: Vec<crate::ledger::types::EventRecord>,
}

/// Result of a successful attendance registration.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReceipt {
    pub digest: String,
}

/// Result of a successful fee-status update.
#[derive(Debug, Clone, Serialize)]
pub struct FeeUpdateReceipt {
    pub digest: String,
}

/// Classification of a service failure, for the HTTP layer's status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No valid signing identity could be loaded. Fatal at startup.
    CredentialUnavailable,
    /// Caller error. Never retried.
    InvalidArgument,
    /// Transport to the node failed. Transient; reads are safe to retry.
    NetworkUnavailable,
    /// The node executed validation and refused. Not retryable as-is.
    Rejected,
    /// No confirmation within the deadline. Outcome indeterminate.
    Timeout,
    /// The read target does not exist.
    NotFound,
    /// The node returned a result shape outside its documented contract.
    ProtocolViolation,
}

/// Error type of the domain facade.
///
/// Wraps the per-layer errors without reclassifying them: a transient
/// failure stays transient all the way up.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] BuildError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ServiceError {
    /// Classification of this failure for transport-layer mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Credential(_) => ErrorKind::CredentialUnavailable,
            ServiceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ServiceError::Ledger(e) => match e {
                LedgerError::NetworkUnavailable(_) => ErrorKind::NetworkUnavailable,
                LedgerError::Rejected(_) => ErrorKind::Rejected,
                LedgerError::Timeout { .. } => ErrorKind::Timeout,
                LedgerError::NotFound(_) => ErrorKind::NotFound,
                LedgerError::ProtocolViolation(_) => ErrorKind::ProtocolViolation,
            },
        }
    }
}
