mod actor;
mod api;
mod ballot_store;
mod driver;
mod election;
mod lease_manager;
#[cfg(test)]
mod local_peers;
mod paxos;
mod peer_client;
mod peers;

pub(crate) use actor::LeaseManagerActor;
pub(crate) use actor::LeaseManagerClient;
pub(crate) use api::AcceptInput;
pub(crate) use api::AcceptOutput;
pub(crate) use api::DecideInput;
pub(crate) use api::DecideOutput;
pub(crate) use api::LeaseManagerError;
pub use api::LeaseManagerStatus;
pub(crate) use api::LeaseRequestInput;
pub(crate) use api::LeaseRequestOutput;
pub(crate) use api::PrepareInput;
pub(crate) use api::PrepareSlotOutput;
pub(crate) use api::PromiseOutput;
pub(crate) use api::Proposal;
pub(crate) use api::StatusUpdateOutput;
pub(crate) use ballot_store::Ballot;
pub(crate) use driver::LeaseManagerDriver;
pub(crate) use lease_manager::LeaseManager;
pub(crate) use lease_manager::LeaseManagerConfig;
pub(crate) use peer_client::GrpcPaxosPeers;
pub(crate) use peers::PaxosPeers;

#[cfg(test)]
pub(crate) use local_peers::LocalLeaseManagerCluster;
#[cfg(test)]
pub(crate) use local_peers::LocalPaxosPeers;
