use crate::cluster::ParticipantIndex;
use crate::lease_manager::{LeaseRequestInput, StatusUpdateOutput};
use crate::quorum::PeerError;
use crate::transaction_manager::{
    SameSlotLeaseExecutionInput, SuspicionInput, SuspicionOutput, TxCommitInput, TxPrepareInput, TxPrepareOutput,
    UpdateOutput,
};

/// Calls a transaction manager makes to the other transaction managers. Indices are positions in
/// the transaction manager roster, ourselves included.
#[async_trait::async_trait]
pub(crate) trait TransactionManagerPeers: Send + Sync + 'static {
    async fn prepare(&self, peer: ParticipantIndex, input: TxPrepareInput) -> Result<TxPrepareOutput, PeerError>;

    async fn commit(&self, peer: ParticipantIndex, input: TxCommitInput) -> Result<(), PeerError>;

    async fn update(&self, peer: ParticipantIndex) -> Result<UpdateOutput, PeerError>;

    /// Blocks until `peer` released its side of a same-slot race.
    async fn same_slot_lease_execution(
        &self,
        peer: ParticipantIndex,
        input: SameSlotLeaseExecutionInput,
    ) -> Result<(), PeerError>;

    async fn suspicion(&self, peer: ParticipantIndex, input: SuspicionInput) -> Result<SuspicionOutput, PeerError>;
}

/// Calls a transaction manager makes to the lease managers. Indices are positions in the lease
/// manager roster.
#[async_trait::async_trait]
pub(crate) trait LeaseManagers: Send + Sync + 'static {
    async fn lease_request(&self, lease_manager: ParticipantIndex, input: LeaseRequestInput) -> Result<(), PeerError>;

    async fn status_update(&self, lease_manager: ParticipantIndex) -> Result<StatusUpdateOutput, PeerError>;
}
