//! Listing projection over the enrollment event log.
//!
//! The ledger has no list-all-records primitive, so the listing view is
//! reconstructed from historical enrollment-completion events. The result
//! is a projection, not authoritative state: eventually consistent, and
//! frozen at each member's enrollment-time name and rank.

use crate::ledger::client::LedgerApi;
use crate::ledger::types::{EventRecord, LedgerError};
use crate::records::types::{ListingEntry, Rank};

use serde::Deserialize;

/// Payload of an enrollment-completion event.
#[derive(Debug, Deserialize)]
struct EnrolledPayload {
	member_id: String,
	name: String,
	rank: String,
}

/// Reconstructs the listing from enrollment events, in ledger emission
/// order (oldest-first unless `descending`). No deduplication: a logical
/// enrollment that somehow emitted twice appears twice.
pub async fn list_enrolled(
	ledger: &dyn LedgerApi,
	event_type: &str,
	descending: bool,
) -> Result<Vec<ListingEntry>, LedgerError> {
	let events = ledger.query_events(event_type, descending).await?;
	events.into_iter().map(entry_from_event).collect()
}

fn entry_from_event(event: EventRecord) -> Result<ListingEntry, LedgerError> {
	let tx_digest = event.id.tx_digest;
	let payload: EnrolledPayload = serde_json::from_value(event.parsed_json).map_err(|e| {
		LedgerError::ProtocolViolation(format!(
			"enrollment event in {} is missing required payload fields: {}",
			tx_digest, e
		))
	})?;
	let rank = Rank::parse(&payload.rank).ok_or_else(|| {
		LedgerError::ProtocolViolation(format!(
			"enrollment event in {} carries unknown rank '{}'",
			tx_digest, payload.rank
		))
	})?;

	Ok(ListingEntry {
		record_id: payload.member_id,
		name: payload.name,
		rank,
		enrolled_at_ms: event.timestamp_ms,
	})
}
