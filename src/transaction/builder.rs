//! Transaction builder for membership operations.
//!
//! Validates domain arguments and shapes them into typed
//! [`TransactionIntent`]s for the three write operations. Validation happens
//! strictly before any transport call: a rejected build has no side effect.

use crate::records::types::Rank;
use crate::transaction::intent::{CallArg, MoveTarget, PureValue, TransactionIntent};

use thiserror::Error;

/// Caller errors detected while building an intent.
///
/// Every variant is in the `InvalidArgument` class: not retryable without
/// changing the request.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("{0} must not be empty")]
	EmptyField(&'static str),

	#[error("unknown rank '{0}'; expected one of white, blue, purple, brown, black")]
	UnknownRank(String),

	#[error("validity period must be at least one day")]
	ZeroValidity,
}

/// Builds intents against one deployed academy package.
///
/// Constructed once from configuration and shared; the admin-capability and
/// clock references are attached here, never supplied by callers.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
	package: String,
	module: String,
	admin_cap: String,
	clock: String,
}

impl TransactionBuilder {
	pub fn new(package: String, module: String, admin_cap: String, clock: String) -> Self {
		Self {
			package,
			module,
			admin_cap,
			clock,
		}
	}

	fn target(&self, function: &str) -> MoveTarget {
		MoveTarget {
			package: self.package.clone(),
			module: self.module.clone(),
			function: function.to_string(),
		}
	}

	/// Type tag of the member record object, for matching object changes.
	pub fn member_type_tag(&self) -> String {
		format!("{}::{}::Member", self.package, self.module)
	}

	/// Suffix of the member type tag, independent of the package id.
	pub fn member_type_suffix(&self) -> String {
		format!("::{}::Member", self.module)
	}

	/// Event type emitted on enrollment completion.
	pub fn enrolled_event_type(&self) -> String {
		format!("{}::{}::MemberEnrolled", self.package, self.module)
	}

	/// Intent for enrolling a new member.
	///
	/// Requires a non-empty external identity token, a non-empty display
	/// name and a rank from the fixed set (case-insensitive).
	pub fn enroll(
		&self,
		sender: &str,
		external_identity: &str,
		display_name: &str,
		rank: &str,
	) -> Result<TransactionIntent, BuildError> {
		let external_identity = non_empty(external_identity, "external_identity")?;
		let display_name = non_empty(display_name, "display_name")?;
		let rank = Rank::parse(rank).ok_or_else(|| BuildError::UnknownRank(rank.to_string()))?;

		Ok(TransactionIntent {
			sender: sender.to_string(),
			target: self.target("enroll_member"),
			args: vec![
				CallArg::Pure(PureValue::Text(external_identity)),
				CallArg::Pure(PureValue::Text(display_name)),
				CallArg::Pure(PureValue::Text(rank.as_str().to_string())),
				CallArg::Pure(PureValue::Address(sender.to_string())),
				CallArg::Object(self.clock.clone()),
			],
		})
	}

	/// Intent for registering an attendance with its photo reference.
	pub fn record_attendance(
		&self,
		sender: &str,
		record_id: &str,
		photo_reference: &str,
	) -> Result<TransactionIntent, BuildError> {
		let record_id = non_empty(record_id, "record_id")?;
		let photo_reference = non_empty(photo_reference, "photo_reference")?;

		Ok(TransactionIntent {
			sender: sender.to_string(),
			target: self.target("record_attendance"),
			args: vec![
				CallArg::Object(record_id),
				CallArg::Pure(PureValue::Text(photo_reference)),
				CallArg::Object(self.clock.clone()),
			],
		})
	}

	/// Intent for a fee-status update.
	///
	/// The fee amount is in integer minor-currency units; the validity
	/// period must be positive. The admin-capability reference is always
	/// attached here — the ledger rejects the call without it, so an intent
	/// missing it is never built in the first place.
	pub fn update_fee_status(
		&self,
		sender: &str,
		record_id: &str,
		fee_amount_minor_units: u64,
		validity_days: u64,
	) -> Result<TransactionIntent, BuildError> {
		let record_id = non_empty(record_id, "record_id")?;
		if validity_days == 0 {
			return Err(BuildError::ZeroValidity);
		}

		Ok(TransactionIntent {
			sender: sender.to_string(),
			target: self.target("update_fee_status"),
			args: vec![
				CallArg::Object(self.admin_cap.clone()),
				CallArg::Object(record_id),
				CallArg::Pure(PureValue::U64(fee_amount_minor_units)),
				CallArg::Pure(PureValue::U64(validity_days)),
				CallArg::Object(self.clock.clone()),
			],
		})
	}
}

fn non_empty(value: &str, field: &'static str) -> Result<String, BuildError> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err(BuildError::EmptyField(field));
	}
	Ok(trimmed.to_string())
}
