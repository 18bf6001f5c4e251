//!
//! Typed transaction intents.
//!
//! A [`TransactionIntent`] is the unsigned description of one state change:
//! a Move call target plus its ordered, explicitly typed arguments. Intents
//! are transient — built per request, encoded, signed and submitted, never
//! persisted.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

/// Signing scope prefix, per the node's transaction signing convention.
const SIGNING_SCOPE: [u8; 3] = [0, 0, 0];

/// A primitive value argument, serialized with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PureValue {
	/// UTF-8 string argument.
	Text(String),
	/// Ledger address argument (`0x…` hex).
	Address(String),
	/// Unsigned 64-bit integer argument.
	U64(u64),
}

/// One call argument: a pure value or a reference to a ledger object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
	Pure(PureValue),
	/// Reference to a shared or owned object by id.
	Object(String),
}

/// Fully qualified Move call target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
	pub package: String,
	pub module: String,
	pub function: String,
}

impl std::fmt::Display for MoveTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}::{}::{}", self.package, self.module, self.function)
	}
}

/// An unsigned state-transition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
	/// Address of the credential that will sign this intent.
	pub sender: String,
	pub target: MoveTarget,
	pub args: Vec<CallArg>,
}

impl TransactionIntent {
	/// Deterministic wire encoding of the intent.
	///
	/// The node treats these bytes as opaque; signature and digest are
	/// computed over exactly this encoding.
	pub fn encode(&self) -> Vec<u8> {
		bincode::serialize(self).expect("intent encoding cannot fail")
	}
}

/// Content digest the credential signs: Blake2b-256 over the scope-prefixed
/// transaction bytes.
pub fn signing_digest(tx_bytes: &[u8]) -> [u8; 32] {
	let mut hasher = Blake2b256::new();
	hasher.update(SIGNING_SCOPE);
	hasher.update(tx_bytes);
	hasher.finalize().into()
}

/// Hex form of the content digest, used to correlate an intent with its
/// eventual confirmation (or lack of one).
pub fn digest_hex(tx_bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(signing_digest(tx_bytes)))
}
