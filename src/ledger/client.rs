//!
//! JSON-RPC client for the remote ledger node.
//!
//! This module is the only place that talks to the node: transaction
//! submission with confirmation detail, single-object reads, and event-log
//! queries. Every failure is classified into [`LedgerError`] so callers can
//! tell transient transport trouble from node-side rejection, an
//! indeterminate timeout, or a protocol contract breach.

use super::types::*;
use crate::transaction::intent::digest_hex;

use async_trait::async_trait;
use backoff::{ExponentialBackoff, future::retry};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Page size for event queries.
const EVENT_PAGE_LIMIT: u64 = 50;

/// Upper bound on the retry window for idempotent reads.
const READ_RETRY_WINDOW: Duration = Duration::from_secs(10);

/// Operations this service needs from the ledger node.
///
/// The production implementation is [`NodeClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait LedgerApi: Send + Sync {
	/// Submits a signed transaction and waits for its confirmation,
	/// requesting full effect, object-change and event detail.
	///
	/// # Errors
	/// `NetworkUnavailable` on transport failure, `Rejected` when the node
	/// refuses the transaction, `Timeout` when no confirmation arrives
	/// within the submission deadline (outcome indeterminate), and
	/// `ProtocolViolation` on an undecodable reply.
	async fn execute_transaction(
		&self,
		tx_bytes: &[u8],
		signature: &str,
	) -> Result<ConfirmationResult, LedgerError>;

	/// Reads the current materialized state of one object.
	///
	/// Read-only, idempotent, safe to call concurrently without bound.
	///
	/// # Errors
	/// `NotFound` when no live object exists at the id,
	/// `NetworkUnavailable` on transport failure.
	async fn get_object(&self, object_id: &str) -> Result<ObjectSnapshot, LedgerError>;

	/// Queries the append-only event log by event type, in ledger emission
	/// order (oldest-first unless `descending`). Pages are drained
	/// internally; no deduplication is performed.
	///
	/// # Errors
	/// `NetworkUnavailable` on transport failure.
	async fn query_events(
		&self,
		event_type: &str,
		descending: bool,
	) -> Result<Vec<EventRecord>, LedgerError>;
}

/// HTTP JSON-RPC client for the ledger node.
#[derive(Clone)]
pub struct NodeClient {
	http: Client,
	rpc_url: String,
	request_timeout: Duration,
	submit_timeout: Duration,
}

impl NodeClient {
	/// Create a new node client.
	///
	/// # Arguments
	/// * `rpc_url` - The node's JSON-RPC HTTP endpoint.
	/// * `request_timeout` - Per-request deadline for reads.
	/// * `submit_timeout` - Deadline for submission plus confirmation wait.
	pub fn new(rpc_url: String, request_timeout: Duration, submit_timeout: Duration) -> Self {
		let http = Client::builder()
			.timeout(request_timeout)
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http,
			rpc_url,
			request_timeout,
			submit_timeout,
		}
	}

	/// Execute one JSON-RPC call. Only transport failures error here;
	/// node-level errors come back inside the [`RpcReply`].
	async fn rpc_call(
		&self,
		method: &str,
		params: serde_json::Value,
		deadline: Duration,
	) -> Result<RpcReply, LedgerError> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});

		let response = self
			.http
			.post(&self.rpc_url)
			.timeout(deadline)
			.json(&body)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(LedgerError::NetworkUnavailable(format!(
				"HTTP error: {}",
				response.status()
			)));
		}

		let reply: RpcReply = response.json().await?;
		Ok(reply)
	}

	/// Same as [`Self::rpc_call`], retrying transient transport failures
	/// with exponential backoff. Only used for idempotent reads.
	async fn rpc_call_with_retry(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<RpcReply, LedgerError> {
		let policy = ExponentialBackoff {
			max_elapsed_time: Some(READ_RETRY_WINDOW),
			..ExponentialBackoff::default()
		};

		retry(policy, || async {
			self.rpc_call(method, params.clone(), self.request_timeout)
				.await
				.map_err(|e| match e {
					LedgerError::NetworkUnavailable(msg) => {
						warn!("Transient transport failure on {}: {}", method, msg);
						backoff::Error::transient(LedgerError::NetworkUnavailable(msg))
					}
					other => backoff::Error::permanent(other),
				})
		})
		.await
	}
}

#[async_trait]
impl LedgerApi for NodeClient {
	async fn execute_transaction(
		&self,
		tx_bytes: &[u8],
		signature: &str,
	) -> Result<ConfirmationResult, LedgerError> {
		let digest = digest_hex(tx_bytes);
		let params = json!([
			BASE64.encode(tx_bytes),
			[signature],
			{ "showEffects": true, "showObjectChanges": true, "showEvents": true },
			"WaitForLocalExecution",
		]);

		debug!("Submitting transaction {}", digest);

		// The inner request gets headroom past the submission deadline so
		// the explicit timeout below is the one that fires.
		let call = self.rpc_call(
			"sui_executeTransactionBlock",
			params,
			self.submit_timeout + Duration::from_secs(5),
		);
		let reply = match tokio::time::timeout(self.submit_timeout, call).await {
			Ok(reply) => reply?,
			Err(_) => {
				warn!(
					"No confirmation for {} within {}s; outcome indeterminate",
					digest,
					self.submit_timeout.as_secs()
				);
				return Err(LedgerError::Timeout {
					digest,
					waited_secs: self.submit_timeout.as_secs(),
				});
			}
		};

		if let Some(err) = reply.error {
			return Err(LedgerError::Rejected(err.message));
		}
		let result = reply.result.ok_or_else(|| {
			LedgerError::ProtocolViolation(
				"execution reply carried neither result nor error".to_string(),
			)
		})?;
		let confirmation: ConfirmationResult = serde_json::from_value(result).map_err(|e| {
			LedgerError::ProtocolViolation(format!("undecodable confirmation: {}", e))
		})?;

		if !confirmation.effects.status.is_success() {
			let reason = confirmation
				.effects
				.status
				.error
				.clone()
				.unwrap_or_else(|| "execution failed without a reported reason".to_string());
			return Err(LedgerError::Rejected(reason));
		}

		debug!("Transaction {} confirmed as {}", digest, confirmation.digest);
		Ok(confirmation)
	}

	async fn get_object(&self, object_id: &str) -> Result<ObjectSnapshot, LedgerError> {
		let params = json!([object_id, { "showContent": true }]);
		let reply = self.rpc_call_with_retry("sui_getObject", params).await?;

		if let Some(err) = reply.error {
			return Err(LedgerError::ProtocolViolation(format!(
				"object read refused: {} (code {})",
				err.message, err.code
			)));
		}
		let result = reply.result.ok_or_else(|| {
			LedgerError::ProtocolViolation("read reply carried neither result nor error".to_string())
		})?;
		let read: ObjectReadResult = serde_json::from_value(result).map_err(|e| {
			LedgerError::ProtocolViolation(format!("undecodable object read: {}", e))
		})?;

		if let Some(err) = read.error {
			return match err.code.as_str() {
				"notExists" | "deleted" => Err(LedgerError::NotFound(object_id.to_string())),
				other => Err(LedgerError::ProtocolViolation(format!(
					"unexpected object read error code '{}'",
					other
				))),
			};
		}
		read.data.ok_or_else(|| {
			LedgerError::ProtocolViolation("object read carried neither data nor error".to_string())
		})
	}

	async fn query_events(
		&self,
		event_type: &str,
		descending: bool,
	) -> Result<Vec<EventRecord>, LedgerError> {
		let mut events = Vec::new();
		let mut cursor: Option<EventId> = None;

		loop {
			let params = json!([
				{ "MoveEventType": event_type },
				cursor,
				EVENT_PAGE_LIMIT,
				descending,
			]);
			let reply = self.rpc_call_with_retry("suix_queryEvents", params).await?;

			if let Some(err) = reply.error {
				return Err(LedgerError::ProtocolViolation(format!(
					"event query refused: {} (code {})",
					err.message, err.code
				)));
			}
			let result = reply.result.ok_or_else(|| {
				LedgerError::ProtocolViolation(
					"event query reply carried neither result nor error".to_string(),
				)
			})?;
			let page: EventPage = serde_json::from_value(result).map_err(|e| {
				LedgerError::ProtocolViolation(format!("undecodable event page: {}", e))
			})?;

			events.extend(page.data);

			if !page.has_next_page {
				break;
			}
			match page.next_cursor {
				Some(next) => cursor = Some(next),
				None => {
					// A further page without a cursor would loop forever.
					error!("Node reported another event page but no cursor");
					return Err(LedgerError::ProtocolViolation(
						"event page claims continuation without a cursor".to_string(),
					));
				}
			}
		}

		debug!("Event query for {} returned {} events", event_type, events.len());
		Ok(events)
	}
}
