//! Everything an application or the `tkv` binary needs: cluster config, server wiring, and the
//! client.
mod client;
mod config_file;
mod options;
mod wiring;

pub use client::lease_manager_status;
pub use client::ClientError;
pub use client::ServerStatus;
pub use client::TkvClient;
pub use client::TransactionInput;
pub use client::TransactionOutput;
pub use config_file::ClientInfo;
pub use config_file::ClusterConfig;
pub use config_file::ConfigError;
pub use options::SlotOptions;
pub use wiring::try_create_lease_manager;
pub use wiring::try_create_server;
pub use wiring::try_create_transaction_manager;
pub use wiring::CreationError;
pub use wiring::LeaseManagerHandle;
pub use wiring::MemberInfo;
pub use wiring::ServerConfig;
pub use wiring::ServerExitedError;
pub use wiring::TkvServer;
pub use wiring::TransactionManagerHandle;
