mod actor;
mod api;
mod conflict;
mod coordinator;
#[cfg(test)]
mod local_peers;
mod peer_client;
mod peers;
mod rendezvous;
mod replication;
mod store;
mod transaction_manager;

pub(crate) use actor::TransactionManagerActor;
pub(crate) use actor::TransactionManagerClient;
pub(crate) use api::AdoptLogOutput;
pub(crate) use api::ApplyStatusInput;
pub(crate) use api::ApplyStatusOutput;
pub(crate) use api::BeginSlotOutput;
pub(crate) use api::CommitPlan;
pub(crate) use api::Contention;
pub use api::KeyValue;
pub(crate) use api::SameSlotLeaseExecutionInput;
pub(crate) use api::SameSlotLeaseExecutionOutput;
pub(crate) use api::SuspicionInput;
pub(crate) use api::SuspicionOutput;
pub(crate) use api::TransactionManagerError;
pub use api::TransactionManagerPhase;
pub use api::TransactionManagerStatus;
pub(crate) use api::TxCommitInput;
pub(crate) use api::TxCommitOutput;
pub(crate) use api::TxId;
pub(crate) use api::TxPrepareInput;
pub(crate) use api::TxPrepareOutput;
pub(crate) use api::TxSubmitInput;
pub(crate) use api::TxSubmitOutput;
pub(crate) use api::UpdateOutput;
pub(crate) use coordinator::TransactionCoordinator;
pub(crate) use peer_client::GrpcLeaseManagers;
pub(crate) use peer_client::GrpcTransactionManagerPeers;
pub(crate) use peers::LeaseManagers;
pub(crate) use peers::TransactionManagerPeers;
pub(crate) use transaction_manager::TransactionManager;
pub(crate) use transaction_manager::TransactionManagerConfig;
