/// Intent construction and validation for membership operations
pub mod builder;
/// Typed transaction intents, encoding and content digests
pub mod intent;

pub use builder::{BuildError, TransactionBuilder};
pub use intent::{CallArg, MoveTarget, PureValue, TransactionIntent, digest_hex, signing_digest};
