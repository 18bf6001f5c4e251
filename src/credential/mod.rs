/// Keystore loading, signing and address derivation
pub mod keystore;

pub use keystore::{Credential, CredentialError, derive_address, load_keystore};
