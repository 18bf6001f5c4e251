//!
//! Domain facade over the ledger record store.
//!
//! Composes credential, builder, client and projection into the record
//! operations consumed by the transport layer: enroll, record attendance,
//! update fee status, get one record, list records. Write operations run
//! build → sign → submit → extract; failures from the lower layers pass
//! through with added context, never reclassified.

use crate::credential::Credential;
use crate::ledger::client::LedgerApi;
use crate::ledger::types::{ConfirmationResult, LedgerError, ObjectSnapshot};
use crate::records::projection;
use crate::records::types::{
	AttendanceReceipt, EnrollReceipt, FeeUpdateReceipt, ListingEntry, Member, Rank, ServiceError,
};
use crate::transaction::builder::TransactionBuilder;
use crate::transaction::intent::TransactionIntent;
use crate::utils::{FEE_CURRENCY_DECIMALS, format_fee_amount};

use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The membership record service.
///
/// Every field is immutable after construction; one instance serves any
/// number of concurrent requests.
pub struct MembershipService {
	ledger: Arc<dyn LedgerApi>,
	credential: Arc<Credential>,
	builder: TransactionBuilder,
}

impl MembershipService {
	pub fn new(
		ledger: Arc<dyn LedgerApi>,
		credential: Arc<Credential>,
		builder: TransactionBuilder,
	) -> Self {
		Self {
			ledger,
			credential,
			builder,
		}
	}

	/// Enrolls a new member and returns the ledger-assigned record id.
	///
	/// On `Timeout` there is no record id to re-resolve; the enrollment
	/// event log is the reconciliation surface, so the timeout is surfaced
	/// directly with its intent digest.
	pub async fn enroll(
		&self,
		external_identity: &str,
		display_name: &str,
		rank: &str,
	) -> Result<EnrollReceipt, ServiceError> {
		let intent =
			self.builder
				.enroll(self.credential.address(), external_identity, display_name, rank)?;
		let confirmation = self.submit(&intent).await?;
		let record_id = self.extract_created_record(&confirmation)?;

		info!(
			"Enrolled member {} as {} ({})",
			record_id, display_name, rank
		);
		Ok(EnrollReceipt {
			record_id,
			digest: confirmation.digest,
			events: confirmation.events,
		})
	}

	/// Registers one attendance with its photo reference.
	pub async fn record_attendance(
		&self,
		record_id: &str,
		photo_reference: &str,
	) -> Result<AttendanceReceipt, ServiceError> {
		let intent =
			self.builder
				.record_attendance(self.credential.address(), record_id, photo_reference)?;

		match self.submit(&intent).await {
			Ok(confirmation) => {
				info!("Recorded attendance for {}", record_id);
				Ok(AttendanceReceipt {
					digest: confirmation.digest,
				})
			}
			Err(err @ LedgerError::Timeout { .. }) => {
				self.reconcile_after_timeout(record_id).await;
				Err(err.into())
			}
			Err(err) => Err(err.into()),
		}
	}

	/// Updates a member's fee status. The admin capability is attached by
	/// the builder; callers cannot supply or override it.
	pub async fn update_fee_status(
		&self,
		record_id: &str,
		fee_amount_minor_units: u64,
		validity_days: u64,
	) -> Result<FeeUpdateReceipt, ServiceError> {
		let intent = self.builder.update_fee_status(
			self.credential.address(),
			record_id,
			fee_amount_minor_units,
			validity_days,
		)?;

		match self.submit(&intent).await {
			Ok(confirmation) => {
				info!(
					"Updated fee status of {}: {} for {} days",
					record_id,
					format_fee_amount(fee_amount_minor_units, FEE_CURRENCY_DECIMALS),
					validity_days
				);
				Ok(FeeUpdateReceipt {
					digest: confirmation.digest,
				})
			}
			Err(err @ LedgerError::Timeout { .. }) => {
				self.reconcile_after_timeout(record_id).await;
				Err(err.into())
			}
			Err(err) => Err(err.into()),
		}
	}

	/// Resolves one record to its current materialized state.
	pub async fn get_record(&self, record_id: &str) -> Result<Member, ServiceError> {
		let snapshot = self.ledger.get_object(record_id).await?;
		Ok(member_from_snapshot(
			snapshot,
			&self.builder.member_type_suffix(),
		)?)
	}

	/// Lists all records via the enrollment event projection.
	///
	/// Entries are frozen at enrollment-time state; callers needing fresh
	/// rank or fee status must re-resolve ids through [`Self::get_record`].
	pub async fn list_records(&self) -> Result<Vec<ListingEntry>, ServiceError> {
		let entries = projection::list_enrolled(
			self.ledger.as_ref(),
			&self.builder.enrolled_event_type(),
			false,
		)
		.await?;
		Ok(entries)
	}

	async fn submit(&self, intent: &TransactionIntent) -> Result<ConfirmationResult, LedgerError> {
		let tx_bytes = intent.encode();
		let signature = self.credential.sign_transaction(&tx_bytes);
		self.ledger.execute_transaction(&tx_bytes, &signature).await
	}

	/// A timed-out write may still have landed. Capture the target's
	/// current state for the operator before the timeout is surfaced, so
	/// the caller does not assume the write did not happen.
	async fn reconcile_after_timeout(&self, record_id: &str) {
		match self.ledger.get_object(record_id).await {
			Ok(snapshot) => warn!(
				"Confirmation timed out; record {} is live at version {} — verify the write against it before retrying",
				record_id, snapshot.version
			),
			Err(err) => warn!(
				"Confirmation timed out and the reconciliation read of {} failed too: {}",
				record_id, err
			),
		}
	}

	/// Extracts the id of the newly created record object from the
	/// confirmation's object-change list. Exactly one created object of the
	/// record type is required.
	fn extract_created_record(
		&self,
		confirmation: &ConfirmationResult,
	) -> Result<String, LedgerError> {
		let type_suffix = self.builder.member_type_suffix();
		let mut created = confirmation
			.object_changes
			.iter()
			.filter(|change| change.is_created_of_type(&type_suffix));

		let first = created.next();
		if created.next().is_some() {
			error!(
				"Confirmation {} reports more than one created record object",
				confirmation.digest
			);
			return Err(LedgerError::ProtocolViolation(format!(
				"confirmation {} contains more than one created record object",
				confirmation.digest
			)));
		}
		match first.and_then(|change| change.object_id.clone()) {
			Some(id) => Ok(id),
			None => {
				error!(
					"Confirmation {} reports no created record object",
					confirmation.digest
				);
				Err(LedgerError::ProtocolViolation(format!(
					"confirmation {} contains no created record object",
					confirmation.digest
				)))
			}
		}
	}
}

/// On-ledger field layout of a member record.
#[derive(Debug, Deserialize)]
struct MemberFields {
	external_identity: String,
	name: String,
	rank: String,
	#[serde(default)]
	fee_paid_until_ms: u64,
	#[serde(default)]
	enrolled_at_ms: u64,
}

fn member_from_snapshot(
	snapshot: ObjectSnapshot,
	type_suffix: &str,
) -> Result<Member, LedgerError> {
	let content = snapshot.content.as_ref().ok_or_else(|| {
		LedgerError::ProtocolViolation(format!(
			"object read of {} returned no content",
			snapshot.object_id
		))
	})?;
	if !content.type_tag.contains(type_suffix) {
		return Err(LedgerError::ProtocolViolation(format!(
			"object {} has type {}, which is not a member record",
			snapshot.object_id, content.type_tag
		)));
	}

	let fields: MemberFields = serde_json::from_value(content.fields.clone()).map_err(|e| {
		LedgerError::ProtocolViolation(format!(
			"record {} is missing required fields: {}",
			snapshot.object_id, e
		))
	})?;
	let rank = Rank::parse(&fields.rank).ok_or_else(|| {
		LedgerError::ProtocolViolation(format!(
			"record {} carries unknown rank '{}'",
			snapshot.object_id, fields.rank
		))
	})?;

	Ok(Member {
		id: snapshot.object_id,
		version: snapshot.version,
		external_identity: fields.external_identity,
		name: fields.name,
		rank,
		fee_paid_until_ms: fields.fee_paid_until_ms,
		enrolled_at_ms: fields.enrolled_at_ms,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::credential::keystore::{Credential, ED25519_SCHEME_FLAG, derive_address};
	use crate::ledger::types::{
		EventId, EventRecord, ExecutionStatus, ObjectChange, ObjectContent, StatusKind,
		TransactionEffects,
	};
	use crate::records::types::ErrorKind;
	use crate::transaction::intent::{CallArg, MoveTarget, PureValue, digest_hex, signing_digest};

	use async_trait::async_trait;
	use base64::Engine;
	use base64::engine::general_purpose::STANDARD as BASE64;
	use ed25519_dalek::{Signature, Verifier, VerifyingKey};
	use serde_json::json;
	use std::collections::{HashMap, HashSet};
	use std::sync::Mutex;
	use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

	const PACKAGE: &str = "0xpkg";
	const ADMIN_CAP: &str = "0xcap";
	const CLOCK: &str = "0x6";
	const BASE_TIME_MS: u64 = 1_700_000_000_000;
	const DAY_MS: u64 = 86_400_000;

	struct FakeObject {
		type_tag: String,
		version: u64,
		fields: serde_json::Value,
	}

	struct FakeState {
		objects: HashMap<String, FakeObject>,
		events: Vec<EventRecord>,
		next_id: u64,
		now_ms: u64,
	}

	/// In-memory stand-in for the remote node. Decodes submitted intent
	/// bytes, verifies the wire signature against the embedded sender, and
	/// executes the academy operations against local state.
	struct FakeLedger {
		state: Mutex<FakeState>,
		timeout_after_apply: AtomicBool,
		duplicate_created: AtomicBool,
		reads: AtomicU64,
	}

	impl FakeLedger {
		fn new() -> Arc<Self> {
			Arc::new(Self {
				state: Mutex::new(FakeState {
					objects: HashMap::new(),
					events: Vec::new(),
					next_id: 0,
					now_ms: BASE_TIME_MS,
				}),
				timeout_after_apply: AtomicBool::new(false),
				duplicate_created: AtomicBool::new(false),
				reads: AtomicU64::new(0),
			})
		}

		fn success() -> TransactionEffects {
			TransactionEffects {
				status: ExecutionStatus {
					status: StatusKind::Success,
					error: None,
				},
			}
		}

		fn apply(
			&self,
			intent: &TransactionIntent,
			digest: String,
		) -> Result<ConfirmationResult, LedgerError> {
			let mut state = self.state.lock().unwrap();
			state.now_ms += 1_000;
			let now = state.now_ms;

			match intent.target.function.as_str() {
				"enroll_member" => {
					let (external, name, rank) = match intent.args.as_slice() {
						[
							CallArg::Pure(PureValue::Text(e)),
							CallArg::Pure(PureValue::Text(n)),
							CallArg::Pure(PureValue::Text(r)),
							CallArg::Pure(PureValue::Address(s)),
							CallArg::Object(clock),
						] if clock == CLOCK && s == &intent.sender => {
							(e.clone(), n.clone(), r.clone())
						}
						_ => return Err(LedgerError::Rejected("malformed enroll arguments".into())),
					};

					state.next_id += 1;
					let id = format!("0x{:064x}", state.next_id);
					let type_tag = format!("{}::academy::Member", PACKAGE);
					state.objects.insert(
						id.clone(),
						FakeObject {
							type_tag: type_tag.clone(),
							version: 1,
							fields: json!({
								"external_identity": external,
								"name": name,
								"rank": rank,
								"fee_paid_until_ms": 0u64,
								"enrolled_at_ms": now,
							}),
						},
					);

					let event = EventRecord {
						id: EventId {
							tx_digest: digest.clone(),
							event_seq: 0,
						},
						event_type: format!("{}::academy::MemberEnrolled", PACKAGE),
						parsed_json: json!({
							"member_id": id,
							"name": name,
							"rank": rank,
						}),
						timestamp_ms: Some(now),
						sender: Some(intent.sender.clone()),
					};
					state.events.push(event.clone());

					let mut object_changes = vec![ObjectChange {
						kind: "created".into(),
						object_type: Some(type_tag.clone()),
						object_id: Some(id),
						version: Some(1),
					}];
					if self.duplicate_created.load(Ordering::SeqCst) {
						object_changes.push(ObjectChange {
							kind: "created".into(),
							object_type: Some(type_tag),
							object_id: Some("0xduplicate".into()),
							version: Some(1),
						});
					}

					Ok(ConfirmationResult {
						digest,
						effects: Self::success(),
						object_changes,
						events: vec![event],
					})
				}
				"record_attendance" => {
					let (record_id, photo) = match intent.args.as_slice() {
						[
							CallArg::Object(id),
							CallArg::Pure(PureValue::Text(p)),
							CallArg::Object(clock),
						] if clock == CLOCK => (id.clone(), p.clone()),
						_ => {
							return Err(LedgerError::Rejected(
								"malformed attendance arguments".into(),
							));
						}
					};

					let member_version = {
						let member = state.objects.get_mut(&record_id).ok_or_else(|| {
							LedgerError::Rejected(format!("object {} does not exist", record_id))
						})?;
						member.version += 1;
						member.version
					};

					state.next_id += 1;
					let attendance_id = format!("0x{:064x}", state.next_id);
					state.objects.insert(
						attendance_id.clone(),
						FakeObject {
							type_tag: format!("{}::academy::Attendance", PACKAGE),
							version: 1,
							fields: json!({
								"member_id": record_id,
								"photo_reference": photo,
								"recorded_at_ms": now,
							}),
						},
					);

					Ok(ConfirmationResult {
						digest,
						effects: Self::success(),
						object_changes: vec![
							ObjectChange {
								kind: "mutated".into(),
								object_type: Some(format!("{}::academy::Member", PACKAGE)),
								object_id: Some(record_id),
								version: Some(member_version),
							},
							ObjectChange {
								kind: "created".into(),
								object_type: Some(format!("{}::academy::Attendance", PACKAGE)),
								object_id: Some(attendance_id),
								version: Some(1),
							},
						],
						events: Vec::new(),
					})
				}
				"update_fee_status" => {
					let (cap, record_id, _amount, days) = match intent.args.as_slice() {
						[
							CallArg::Object(cap),
							CallArg::Object(id),
							CallArg::Pure(PureValue::U64(amount)),
							CallArg::Pure(PureValue::U64(days)),
							CallArg::Object(clock),
						] if clock == CLOCK => (cap.clone(), id.clone(), *amount, *days),
						_ => {
							return Err(LedgerError::Rejected(
								"malformed fee update arguments".into(),
							));
						}
					};
					if cap != ADMIN_CAP {
						return Err(LedgerError::Rejected("missing admin capability".into()));
					}

					let member = state.objects.get_mut(&record_id).ok_or_else(|| {
						LedgerError::Rejected(format!("object {} does not exist", record_id))
					})?;
					member.version += 1;
					member.fields["fee_paid_until_ms"] = json!(now + days * DAY_MS);
					let version = member.version;

					Ok(ConfirmationResult {
						digest,
						effects: Self::success(),
						object_changes: vec![ObjectChange {
							kind: "mutated".into(),
							object_type: Some(format!("{}::academy::Member", PACKAGE)),
							object_id: Some(record_id),
							version: Some(version),
						}],
						events: Vec::new(),
					})
				}
				other => Err(LedgerError::Rejected(format!("unknown function {}", other))),
			}
		}

		fn insert_object(&self, id: &str, type_tag: &str, fields: serde_json::Value) {
			self.state.lock().unwrap().objects.insert(
				id.to_string(),
				FakeObject {
					type_tag: type_tag.to_string(),
					version: 1,
					fields,
				},
			);
		}
	}

	fn verify_wire_signature(
		tx_bytes: &[u8],
		signature: &str,
		sender: &str,
	) -> Result<(), LedgerError> {
		let wire = BASE64
			.decode(signature)
			.map_err(|_| LedgerError::Rejected("undecodable signature".into()))?;
		if wire.len() != 1 + 64 + 32 || wire[0] != ED25519_SCHEME_FLAG {
			return Err(LedgerError::Rejected("malformed signature envelope".into()));
		}
		let signature = Signature::from_slice(&wire[1..65])
			.map_err(|_| LedgerError::Rejected("malformed signature bytes".into()))?;
		let mut pk_bytes = [0u8; 32];
		pk_bytes.copy_from_slice(&wire[65..]);
		let public_key = VerifyingKey::from_bytes(&pk_bytes)
			.map_err(|_| LedgerError::Rejected("malformed public key".into()))?;

		public_key
			.verify(&signing_digest(tx_bytes), &signature)
			.map_err(|_| LedgerError::Rejected("invalid signature".into()))?;
		if derive_address(&public_key) != sender {
			return Err(LedgerError::Rejected("signer does not match sender".into()));
		}
		Ok(())
	}

	#[async_trait]
	impl LedgerApi for FakeLedger {
		async fn execute_transaction(
			&self,
			tx_bytes: &[u8],
			signature: &str,
		) -> Result<ConfirmationResult, LedgerError> {
			let intent: TransactionIntent = bincode::deserialize(tx_bytes)
				.map_err(|_| LedgerError::Rejected("undecodable transaction bytes".into()))?;
			verify_wire_signature(tx_bytes, signature, &intent.sender)?;

			let digest = digest_hex(tx_bytes);
			let confirmation = self.apply(&intent, digest.clone())?;

			// Simulate an applied-but-unconfirmed write.
			if self.timeout_after_apply.swap(false, Ordering::SeqCst) {
				return Err(LedgerError::Timeout {
					digest,
					waited_secs: 60,
				});
			}
			Ok(confirmation)
		}

		async fn get_object(&self, object_id: &str) -> Result<ObjectSnapshot, LedgerError> {
			self.reads.fetch_add(1, Ordering::SeqCst);
			let state = self.state.lock().unwrap();
			match state.objects.get(object_id) {
				Some(object) => Ok(ObjectSnapshot {
					object_id: object_id.to_string(),
					version: object.version,
					content: Some(ObjectContent {
						type_tag: object.type_tag.clone(),
						fields: object.fields.clone(),
					}),
				}),
				None => Err(LedgerError::NotFound(object_id.to_string())),
			}
		}

		async fn query_events(
			&self,
			event_type: &str,
			descending: bool,
		) -> Result<Vec<EventRecord>, LedgerError> {
			let state = self.state.lock().unwrap();
			let mut events: Vec<EventRecord> = state
				.events
				.iter()
				.filter(|e| e.event_type == event_type)
				.cloned()
				.collect();
			if descending {
				events.reverse();
			}
			Ok(events)
		}
	}

	fn service_with(ledger: Arc<FakeLedger>) -> MembershipService {
		service_with_builder(
			ledger,
			TransactionBuilder::new(
				PACKAGE.to_string(),
				"academy".to_string(),
				ADMIN_CAP.to_string(),
				CLOCK.to_string(),
			),
		)
	}

	fn service_with_builder(
		ledger: Arc<FakeLedger>,
		builder: TransactionBuilder,
	) -> MembershipService {
		let credential = Arc::new(Credential::from_secret_bytes(&[42u8; 32]));
		MembershipService::new(ledger, credential, builder)
	}

	#[tokio::test]
	async fn test_enroll_round_trip() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger.clone());

		let receipt = service
			.enroll("google-ana", "Ana", "White")
			.await
			.expect("enroll failed");
		let member = service
			.get_record(&receipt.record_id)
			.await
			.expect("get failed");

		assert_eq!(member.id, receipt.record_id);
		assert_eq!(member.name, "Ana");
		assert_eq!(member.rank, Rank::White);
		assert_eq!(member.external_identity, "google-ana");
		assert_eq!(member.fee_paid_until_ms, 0);
		assert_eq!(member.version, 1);
		assert_eq!(receipt.events.len(), 1);
	}

	#[tokio::test]
	async fn test_enroll_assigns_unique_ids() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger);

		let a = service.enroll("g-1", "Ana", "white").await.unwrap();
		let b = service.enroll("g-2", "Bruno", "blue").await.unwrap();
		assert_ne!(a.record_id, b.record_id);
		assert_ne!(a.digest, b.digest);
	}

	#[tokio::test]
	async fn test_listing_returns_all_enrollments() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger);

		service.enroll("g-1", "Ana", "white").await.unwrap();
		service.enroll("g-2", "Bruno", "blue").await.unwrap();
		service.enroll("g-3", "Carla", "black").await.unwrap();

		let entries = service.list_records().await.expect("listing failed");
		assert_eq!(entries.len(), 3);

		let distinct: HashSet<_> = entries.iter().map(|e| e.record_id.clone()).collect();
		assert_eq!(distinct.len(), 3);

		for entry in &entries {
			let member = service.get_record(&entry.record_id).await.unwrap();
			assert_eq!(member.name, entry.name);
			assert_eq!(member.rank, entry.rank);
		}
	}

	#[tokio::test]
	async fn test_get_record_is_idempotent() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger);

		let receipt = service.enroll("g-1", "Ana", "white").await.unwrap();
		let first = service.get_record(&receipt.record_id).await.unwrap();
		let second = service.get_record(&receipt.record_id).await.unwrap();

		assert_eq!(first.name, second.name);
		assert_eq!(first.rank, second.rank);
		assert_eq!(first.fee_paid_until_ms, second.fee_paid_until_ms);
		assert_eq!(first.version, second.version);
	}

	#[tokio::test]
	async fn test_get_record_not_found() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger);

		let err = service.get_record("0xmissing").await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
	}

	#[tokio::test]
	async fn test_invalid_rank_is_rejected_before_any_network_call() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger.clone());

		let err = service.enroll("g-1", "Ana", "yellow").await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidArgument);

		// Nothing reached the ledger.
		assert!(ledger.state.lock().unwrap().objects.is_empty());
		assert!(ledger.state.lock().unwrap().events.is_empty());
	}

	#[tokio::test]
	async fn test_fee_update_advances_paid_until() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger);

		let receipt = service.enroll("g-1", "Ana", "white").await.unwrap();
		service
			.update_fee_status(&receipt.record_id, 15_000, 30)
			.await
			.expect("fee update failed");

		let member = service.get_record(&receipt.record_id).await.unwrap();
		// Enrollment ticks the fake clock once, the fee update once more.
		assert_eq!(member.fee_paid_until_ms, BASE_TIME_MS + 2_000 + 30 * DAY_MS);
		assert_eq!(member.version, 2);
	}

	#[tokio::test]
	async fn test_fee_update_without_valid_admin_cap_is_rejected() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger.clone());
		let receipt = service.enroll("g-1", "Ana", "white").await.unwrap();

		// A service configured with the wrong capability reference: the
		// ledger refuses the privileged call.
		let misconfigured = service_with_builder(
			ledger,
			TransactionBuilder::new(
				PACKAGE.to_string(),
				"academy".to_string(),
				"0xwrongcap".to_string(),
				CLOCK.to_string(),
			),
		);
		let err = misconfigured
			.update_fee_status(&receipt.record_id, 15_000, 30)
			.await
			.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Rejected);
	}

	#[tokio::test]
	async fn test_timeout_triggers_reconciliation_read_and_side_effect_survives() {
		let ledger = FakeLedger::new();
		let service = service_with(ledger.clone());

		let receipt = service.enroll("g-1", "Ana", "white").await.unwrap();
		let before = service.get_record(&receipt.record_id).await.unwrap();

		ledger.timeout_after_apply.store(true, Ordering::SeqCst);
		let reads_before = ledger.reads.load(Ordering::SeqCst);

		let err = service
			.record_attendance(&receipt.record_id, "https://photos/1.jpg")
			.await
			.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Timeout);

		// The facade consulted the record before surfacing the timeout.
		assert_eq!(ledger.reads.load(Ordering::SeqCst), reads_before + 1);

		// The write landed despite the missing confirmation.
		let after = service.get_record(&receipt.record_id).await.unwrap();
		assert!(after.version > before.version);
	}

	#[tokio::test]
	async fn test_duplicate_created_record_is_protocol_violation() {
		let ledger = FakeLedger::new();
		ledger.duplicate_created.store(true, Ordering::SeqCst);
		let service = service_with(ledger);

		let err = service.enroll("g-1", "Ana", "white").await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
	}

	#[tokio::test]
	async fn test_signature_must_match_sender() {
		let ledger = FakeLedger::new();
		let credential = Credential::from_secret_bytes(&[42u8; 32]);

		let intent = TransactionIntent {
			sender: "0xsomebody_else".to_string(),
			target: MoveTarget {
				package: PACKAGE.to_string(),
				module: "academy".to_string(),
				function: "enroll_member".to_string(),
			},
			args: vec![],
		};
		let tx_bytes = intent.encode();
		let signature = credential.sign_transaction(&tx_bytes);

		let err = ledger
			.execute_transaction(&tx_bytes, &signature)
			.await
			.unwrap_err();
		assert!(matches!(err, LedgerError::Rejected(reason) if reason.contains("sender")));
	}

	#[tokio::test]
	async fn test_get_record_rejects_foreign_object_type() {
		let ledger = FakeLedger::new();
		ledger.insert_object(
			"0xcoin",
			"0x2::coin::Coin",
			json!({ "balance": 100u64 }),
		);
		let service = service_with(ledger);

		let err = service.get_record("0xcoin").await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
	}
}
