//!
//! File-keystore credential loading and transaction signing.
//!
//! The keystore is a JSON array of base64-encoded secret-key blobs (the
//! ledger CLI's own format). Exactly the first entry is used. A decoded blob
//! of raw-key length plus one carries a leading scheme flag byte, which is
//! stripped after the length check; raw-length blobs are used as-is.

use crate::transaction::intent::signing_digest;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use std::path::{Path, PathBuf};

type Blake2b256 = Blake2b<U32>;

/// Raw Ed25519 secret key length in bytes.
pub const ED25519_SECRET_LENGTH: usize = 32;

/// Signature scheme flag for Ed25519, as used in keystore entries, wire
/// signatures and address derivation.
pub const ED25519_SCHEME_FLAG: u8 = 0x00;

/// Reasons no signing identity could be produced.
///
/// All variants are in the `CredentialUnavailable` class and are fatal at
/// startup: the service cannot authorize any transaction without a key.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
	#[error("keystore not readable at {}: {}", .path.display(), .source)]
	Unreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("keystore is not a JSON list of base64 keys: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("keystore contains no keys")]
	Empty,

	#[error("keystore entry is not valid base64: {0}")]
	Undecodable(#[from] base64::DecodeError),

	#[error("decoded key is {0} bytes, expected 32 raw or 33 flagged")]
	InvalidLength(usize),
}

/// The service's signing identity. Immutable after load, shared read-only.
pub struct Credential {
	signing_key: SigningKey,
	address: String,
}

// Key material must never reach logs; only the derived address is shown.
impl std::fmt::Debug for Credential {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credential")
			.field("address", &self.address)
			.field("signing_key", &"<redacted>")
			.finish()
	}
}

impl Credential {
	pub fn from_secret_bytes(secret: &[u8; ED25519_SECRET_LENGTH]) -> Self {
		let signing_key = SigningKey::from_bytes(secret);
		let address = derive_address(&signing_key.verifying_key());
		Self {
			signing_key,
			address,
		}
	}

	/// The on-ledger address this credential signs for.
	pub fn address(&self) -> &str {
		&self.address
	}

	/// Signs encoded transaction bytes, producing the wire signature:
	/// base64 of `flag || signature || public_key`.
	pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
		let digest = signing_digest(tx_bytes);
		let signature = self.signing_key.sign(&digest);

		let mut wire = Vec::with_capacity(1 + 64 + 32);
		wire.push(ED25519_SCHEME_FLAG);
		wire.extend_from_slice(&signature.to_bytes());
		wire.extend_from_slice(&self.signing_key.verifying_key().to_bytes());
		BASE64.encode(wire)
	}
}

/// Derives the hex ledger address: Blake2b-256 over the scheme-flagged
/// public key bytes.
pub fn derive_address(public_key: &VerifyingKey) -> String {
	let mut hasher = Blake2b256::new();
	hasher.update([ED25519_SCHEME_FLAG]);
	hasher.update(public_key.to_bytes());
	format!("0x{}", hex::encode(hasher.finalize()))
}

/// Loads the credential from the first keystore entry.
pub async fn load_keystore(path: &Path) -> Result<Credential, CredentialError> {
	let raw = tokio::fs::read_to_string(path)
		.await
		.map_err(|source| CredentialError::Unreadable {
			path: path.to_path_buf(),
			source,
		})?;

	let entries: Vec<String> = serde_json::from_str(&raw)?;
	let first = entries.first().ok_or(CredentialError::Empty)?;
	let decoded = BASE64.decode(first)?;

	let mut secret = [0u8; ED25519_SECRET_LENGTH];
	match decoded.len() {
		n if n == ED25519_SECRET_LENGTH + 1 => secret.copy_from_slice(&decoded[1..]),
		n if n == ED25519_SECRET_LENGTH => secret.copy_from_slice(&decoded),
		n => return Err(CredentialError::InvalidLength(n)),
	}

	Ok(Credential::from_secret_bytes(&secret))
}
