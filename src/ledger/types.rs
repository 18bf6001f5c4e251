//! Types for the node's JSON-RPC protocol and the ledger error taxonomy.

use serde::{Deserialize, Serialize};

/// Failures of ledger interaction, classified for caller judgment.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transport to the node failed. Transient: reads are safe to retry;
    /// resubmitting a write is safe only while the intent is unconfirmed.
    #[error("node unreachable: {0}")]
    NetworkUnavailable(String),

    /// The node executed validation and refused. Not retryable without
    /// changing the intent.
    #[error("rejected by node: {0}")]
    Rejected(String),

    /// No confirmation within the deadline. The outcome is indeterminate:
    /// the transaction may still finalize. Reconcile by re-reading state,
    /// never blind-retry.
    #[error("no confirmation within {waited_secs}s for intent {digest}")]
    Timeout { digest: String, waited_secs: u64 },

    /// No live object at the requested id.
    #[error("no live object at {0}")]
    NotFound(String),

    /// The node's response shape is inconsistent with its documented
    /// contract. Always surfaced, never swallowed.
    #[error("node response violated protocol contract: {0}")]
    ProtocolViolation(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::NetworkUnavailable(err.to_string())
    }
}

/// Outcome of a submitted, signed transaction. 1:1 with the intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResult {
    /// Content-derived transaction digest assigned by the node.
    pub digest: String,
    /// Execution effects, including the success/failure status.
    pub effects: TransactionEffects,
    /// Object-state changes caused by the transaction.
    #[serde(default)]
    pub object_changes: Vec<ObjectChange>,
    /// Events emitted by the transaction.
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// Execution effects of a confirmed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
}

/// Success or failure of on-ledger execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: StatusKind,
    /// Failure reason, present when `status` is `failure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Failure,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == StatusKind::Success
    }
}

/// One object-state change reported in a confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectChange {
    /// Change kind: `created`, `mutated`, `deleted`, `published`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Full type tag of the affected object, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl ObjectChange {
    /// Whether this is a creation of an object whose type tag contains the
    /// given fragment.
    pub fn is_created_of_type(&self, type_fragment: &str) -> bool {
        self.kind == "created"
            && self
                .object_type
                .as_deref()
                .is_some_and(|t| t.contains(type_fragment))
    }
}

/// Position of an event in the ledger's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    pub tx_digest: String,
    pub event_seq: u64,
}

/// One emitted event, with its decoded payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    /// Full event type tag (`package::module::Name`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Decoded event payload as reported by the node.
    #[serde(default)]
    pub parsed_json: serde_json::Value,
    /// Ledger emission timestamp (ms), when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// One page of an event query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub data: Vec<EventRecord>,
    #[serde(default)]
    pub next_cursor: Option<EventId>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Materialized state of one object, as of a read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSnapshot {
    pub object_id: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ObjectContent>,
}

impl ObjectSnapshot {
    /// Type tag of the object content, when the read included content.
    pub fn type_tag(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.type_tag.as_str())
    }
}

/// Decoded object content from a `showContent` read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContent {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// Result envelope of an object read: either data or a read error.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectReadResult {
    #[serde(default)]
    pub data: Option<ObjectSnapshot>,
    #[serde(default)]
    pub error: Option<ObjectReadError>,
}

/// Node-reported object read error (`notExists`, `deleted`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReadError {
    pub code: String,
    #[serde(default)]
    pub object_id: Option<String>,
}

/// JSON-RPC 2.0 reply envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcReply {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}
