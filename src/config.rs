//! Service configuration loaded from environment variables.
//!
//! All settings come from the environment (or a `.env` file via `dotenvy`).
//! The node endpoint can be given directly with `LEDGER_RPC_URL` or picked
//! by network name with `LEDGER_NETWORK`.

use std::path::PathBuf;
use std::time::Duration;

/// Name of the on-ledger module every operation targets.
pub const LEDGER_MODULE: &str = "academy";

const DEFAULT_NETWORK: &str = "testnet";
const DEFAULT_CLOCK_ID: &str = "0x6";
const DEFAULT_KEYSTORE_PATH: &str = "~/.sui/sui_config/sui.keystore";
const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration problems that prevent startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("unknown ledger network '{0}'; expected mainnet, testnet, devnet or localnet")]
    UnknownNetwork(String),
}

/// Top-level service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// JSON-RPC endpoint of the ledger node.
    pub rpc_url: String,

    /// Id of the deployed academy package.
    pub package_id: String,

    /// Id of the admin-capability object referenced by privileged calls.
    pub admin_cap_id: String,

    /// Id of the shared clock object.
    pub clock_id: String,

    /// Path to the local keystore file (tilde-expanded).
    pub keystore_path: PathBuf,

    /// Deadline for transaction submission plus confirmation wait.
    pub submit_timeout: Duration,

    /// Per-request deadline for reads.
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `PACKAGE_ID` or `ADMIN_CAP_ID` is unset, or
    /// when `LEDGER_NETWORK` names an unknown network and no explicit
    /// `LEDGER_RPC_URL` is given.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let rpc_url = match std::env::var("LEDGER_RPC_URL") {
            Ok(url) => url,
            Err(_) => {
                let network = std::env::var("LEDGER_NETWORK")
                    .unwrap_or_else(|_| DEFAULT_NETWORK.to_string());
                fullnode_url(&network)?
            }
        };

        let package_id = require("PACKAGE_ID")?;
        let admin_cap_id = require("ADMIN_CAP_ID")?;
        let clock_id =
            std::env::var("CLOCK_ID").unwrap_or_else(|_| DEFAULT_CLOCK_ID.to_string());

        let keystore_path = std::env::var("KEYSTORE_PATH")
            .unwrap_or_else(|_| DEFAULT_KEYSTORE_PATH.to_string());
        let keystore_path = PathBuf::from(shellexpand::tilde(&keystore_path).into_owned());

        let submit_timeout = Duration::from_secs(parse_env(
            "SUBMIT_TIMEOUT_SECS",
            DEFAULT_SUBMIT_TIMEOUT_SECS,
        ));
        let request_timeout = Duration::from_secs(parse_env(
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));

        Ok(Self {
            rpc_url,
            package_id,
            admin_cap_id,
            clock_id,
            keystore_path,
            submit_timeout,
            request_timeout,
        })
    }
}

/// Well-known fullnode endpoint for a named network.
fn fullnode_url(network: &str) -> Result<String, ConfigError> {
    match network {
        "mainnet" | "testnet" | "devnet" => {
            Ok(format!("https://fullnode.{}.sui.io:443", network))
        }
        "localnet" => Ok("http://127.0.0.1:9000".to_string()),
        other => Err(ConfigError::UnknownNetwork(other.to_string())),
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Reads a numeric variable, falling back to the default when unset or
/// unparsable.
fn parse_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
