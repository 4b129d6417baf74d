use slog::Drain;
use std::error::Error;
use std::net::SocketAddr;
use tkv::{MemberInfo, ServerConfig, SlotOptions, SlotSchedule};
use tokio::time::Duration;

/// Runs a one lease manager, one transaction manager cluster in process and keeps per-key counters
/// in it.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let logger = create_root_logger_for_stdout();
    let (_lease_manager, _transaction_manager) = start_cluster(logger.clone()).await?;

    let mut accumulator = accumulator_impl::Accumulator::new(logger, addr(4021))?;

    assert_eq!(100, accumulator.add("k1", 100).await?);
    assert_eq!(100, accumulator.add("k2", 100).await?);
    assert_eq!(-1, accumulator.add("k1", -101).await?);

    assert_eq!(-1, accumulator.get("k1").await?);
    assert_eq!(100, accumulator.get("k2").await?);
    assert_eq!(0, accumulator.get("k3").await?);

    println!("Accumulator agrees with itself");
    Ok(())
}

async fn start_cluster(logger: slog::Logger) -> Result<(tkv::TkvServer, tkv::TkvServer), Box<dyn Error>> {
    let config = |my_id: &str| ServerConfig {
        my_id: my_id.into(),
        lease_managers: vec![MemberInfo {
            id: "LM0".into(),
            addr: addr(4011),
        }],
        transaction_managers: vec![MemberInfo {
            id: "TM0".into(),
            addr: addr(4021),
        }],
        schedule: SlotSchedule::all_normal(Duration::from_millis(200)),
        logger: logger.new(slog::o!("ParticipantId" => my_id.to_string())),
        options: SlotOptions::default(),
    };

    let lease_manager = tkv::try_create_server(config("LM0")).await?;
    let transaction_manager = tkv::try_create_server(config("TM0")).await?;

    Ok((lease_manager, transaction_manager))
}

fn addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn create_root_logger_for_stdout() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, slog::Level::Info).fuse();

    slog::Logger::root(drain, slog::o!())
}

mod accumulator_impl {
    use std::error::Error;
    use std::net::SocketAddr;
    use tkv::{KeyValue, TkvClient, TransactionInput};

    pub struct Accumulator {
        client: TkvClient,
    }

    impl Accumulator {
        pub fn new(logger: slog::Logger, transaction_manager: SocketAddr) -> Result<Self, Box<dyn Error>> {
            Ok(Accumulator {
                client: TkvClient::new(logger, "accumulator", transaction_manager)?,
            })
        }

        /// Not atomic across the read and the write. Fine with a single accumulator.
        pub async fn add(&mut self, key: &str, value: i64) -> Result<i64, Box<dyn Error>> {
            let new_value = self.get(key).await? + value;

            self.client
                .tx_submit(TransactionInput {
                    reads: Vec::new(),
                    writes: vec![KeyValue::new(key, new_value)],
                })
                .await?;

            Ok(new_value)
        }

        pub async fn get(&self, key: &str) -> Result<i64, Box<dyn Error>> {
            let output = self
                .client
                .tx_submit(TransactionInput {
                    reads: vec![key.to_string()],
                    writes: Vec::new(),
                })
                .await?;

            // Keys never written read as 0.
            Ok(output.values_read.first().map(|kv| kv.value).unwrap_or(0))
        }
    }
}
