use chrono::Local;
use slog::Drain;
use std::error::Error;
use tkv::{ClusterConfig, ServerConfig, SlotOptions, TkvServer};

/// `tkv <config-file> <process-id>` runs the lease manager or transaction manager named by
/// `process-id` until Ctrl-C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <config-file> <process-id>", args[0]);
        std::process::exit(2);
    }
    let (config_path, my_id) = (&args[1], args[2].clone());

    let cluster_config = ClusterConfig::from_file(config_path)?;
    let logger = create_root_logger_for_stdout(my_id.clone());
    let start_delay = cluster_config.start_delay(Local::now().time());
    slog::info!(logger, "First slot begins in {:?}", start_delay);

    let server = tkv::try_create_server(ServerConfig {
        my_id,
        lease_managers: cluster_config.lease_managers,
        transaction_managers: cluster_config.transaction_managers,
        schedule: cluster_config.schedule,
        logger: logger.clone(),
        options: SlotOptions {
            start_delay: Some(start_delay),
            ..SlotOptions::default()
        },
    })
    .await?;

    match &server {
        TkvServer::LeaseManager(_) => slog::info!(logger, "Started lease manager"),
        TkvServer::TransactionManager(_) => slog::info!(logger, "Started transaction manager"),
    }

    tokio::signal::ctrl_c().await?;
    slog::info!(logger, "Shutting down");
    server.shutdown();

    Ok(())
}

fn create_root_logger_for_stdout(participant_id: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).use_file_location().build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("ParticipantId" => participant_id))
}
