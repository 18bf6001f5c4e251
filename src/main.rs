use std::sync::Arc;

use academy_ledger::config::{LEDGER_MODULE, ServiceConfig};
use academy_ledger::credential::load_keystore;
use academy_ledger::ledger::NodeClient;
use academy_ledger::records::MembershipService;
use academy_ledger::transaction::TransactionBuilder;

use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	info!("Starting academy ledger service");

	let config = match ServiceConfig::from_env() {
		Ok(config) => config,
		Err(e) => {
			error!("Invalid configuration: {}", e);
			return;
		}
	};
	info!("Using ledger node at {}", config.rpc_url);

	// No valid signing identity means no transaction can ever be
	// authorized; nothing to do but stop.
	let credential = match load_keystore(&config.keystore_path).await {
		Ok(credential) => Arc::new(credential),
		Err(e) => {
			error!("Failed to load signing credential: {}", e);
			return;
		}
	};
	info!("Loaded signing credential for {}", credential.address());

	let client = Arc::new(NodeClient::new(
		config.rpc_url.clone(),
		config.request_timeout,
		config.submit_timeout,
	));
	let builder = TransactionBuilder::new(
		config.package_id.clone(),
		LEDGER_MODULE.to_string(),
		config.admin_cap_id.clone(),
		config.clock_id.clone(),
	);
	let service = MembershipService::new(client, credential, builder);

	info!("Created membership service");

	// Connectivity probe through the listing projection.
	match service.list_records().await {
		Ok(entries) => {
			info!("Ledger reachable; {} members enrolled", entries.len());
			for entry in entries.iter().take(10) {
				info!("  {} ({}) -> {}", entry.name, entry.rank, entry.record_id);
			}
		}
		Err(e) => {
			error!("Listing probe failed: {}", e);
		}
	}
}
