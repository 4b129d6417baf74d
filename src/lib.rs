mod actor;
mod api;
mod cluster;
mod lease;
mod lease_manager;
mod quorum;
mod server;
#[cfg(test)]
mod test_utils;
mod timer;
mod transaction_manager;
mod grpc {
    include!("../generated/tkv.rs");
}

pub use api::lease_manager_status;
pub use api::try_create_lease_manager;
pub use api::try_create_server;
pub use api::try_create_transaction_manager;
pub use api::ClientError;
pub use api::ClientInfo;
pub use api::ClusterConfig;
pub use api::ConfigError;
pub use api::CreationError;
pub use api::LeaseManagerHandle;
pub use api::MemberInfo;
pub use api::ServerConfig;
pub use api::ServerExitedError;
pub use api::ServerStatus;
pub use api::SlotOptions;
pub use api::TkvClient;
pub use api::TkvServer;
pub use api::TransactionInput;
pub use api::TransactionManagerHandle;
pub use api::TransactionOutput;
pub use cluster::ParticipantId;
pub use cluster::ProcessState;
pub use cluster::Slot;
pub use cluster::SlotSchedule;
pub use lease_manager::LeaseManagerStatus;
pub use transaction_manager::KeyValue;
pub use transaction_manager::TransactionManagerPhase;
pub use transaction_manager::TransactionManagerStatus;

// `crate::{root_mod}` holds no code, only `mod` and `pub use` statements. No `mod` is `pub`; public
// types are exported one `use` at a time.
