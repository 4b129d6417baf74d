use crate::cluster::{ParticipantIndex, Roster};
use crate::grpc::grpc_lease_manager_client::GrpcLeaseManagerClient;
use crate::grpc::grpc_transaction_manager_peer_client::GrpcTransactionManagerPeerClient;
use crate::grpc::{
    ProtoKeyValue, ProtoLease, ProtoLeaseRequestReq, ProtoSameSlotLeaseExecutionReq, ProtoStatusUpdateReq,
    ProtoSuspicionReq, ProtoTxCommitReq, ProtoTxPrepareReq, ProtoUpdateReq,
};
use crate::lease::DecidedSlot;
use crate::lease_manager::{LeaseRequestInput, StatusUpdateOutput};
use crate::quorum::{lazy_channel, PeerError};
use crate::transaction_manager::{
    KeyValue, LeaseManagers, SameSlotLeaseExecutionInput, SuspicionInput, SuspicionOutput, TransactionManagerPeers,
    TxCommitInput, TxPrepareInput, TxPrepareOutput, UpdateOutput,
};
use tonic::transport::Channel;

/// Peer calls to every transaction manager in the roster, ourselves included, over gRPC.
pub(crate) struct GrpcTransactionManagerPeers {
    logger: slog::Logger,
    clients: Vec<GrpcTransactionManagerPeerClient<Channel>>,
}

impl GrpcTransactionManagerPeers {
    pub(crate) fn new(logger: slog::Logger, roster: &Roster) -> Result<Self, PeerError> {
        let mut clients = Vec::with_capacity(roster.len());
        for member in roster.members() {
            clients.push(GrpcTransactionManagerPeerClient::new(lazy_channel(member.addr)?));
        }

        Ok(GrpcTransactionManagerPeers { logger, clients })
    }

    fn client(&self, index: ParticipantIndex) -> Result<GrpcTransactionManagerPeerClient<Channel>, PeerError> {
        self.clients
            .get(index.as_usize())
            .cloned()
            .ok_or(PeerError::UnknownParticipant(index))
    }
}

#[async_trait::async_trait]
impl TransactionManagerPeers for GrpcTransactionManagerPeers {
    async fn prepare(&self, peer: ParticipantIndex, input: TxPrepareInput) -> Result<TxPrepareOutput, PeerError> {
        let rpc_request = ProtoTxPrepareReq {
            coordinator: input.coordinator.into_inner(),
            tx_id: input.tx_id.as_str().to_string(),
            slot: input.slot.as_u64(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_request);
        let rpc_reply = self.client(peer)?.prepare(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_reply);

        Ok(TxPrepareOutput {
            vote: rpc_reply?.into_inner().vote,
        })
    }

    async fn commit(&self, peer: ParticipantIndex, input: TxCommitInput) -> Result<(), PeerError> {
        let rpc_request = ProtoTxCommitReq {
            coordinator: input.coordinator.into_inner(),
            tx_id: input.tx_id.as_str().to_string(),
            writes: input.writes.into_iter().map(ProtoKeyValue::from).collect(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_request);
        let rpc_reply = self.client(peer)?.commit(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_reply);

        rpc_reply.map(|_| ()).map_err(PeerError::from)
    }

    async fn update(&self, peer: ParticipantIndex) -> Result<UpdateOutput, PeerError> {
        let rpc_request = ProtoUpdateReq {};

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_request);
        let rpc_reply = self.client(peer)?.update(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_reply);

        Ok(UpdateOutput {
            write_log: rpc_reply?
                .into_inner()
                .write_log
                .into_iter()
                .map(KeyValue::from)
                .collect(),
        })
    }

    async fn same_slot_lease_execution(
        &self,
        peer: ParticipantIndex,
        input: SameSlotLeaseExecutionInput,
    ) -> Result<(), PeerError> {
        let rpc_request = ProtoSameSlotLeaseExecutionReq {
            slot: input.slot.as_u64(),
            lease: Some(ProtoLease::from(input.lease)),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_request);
        let rpc_reply = self.client(peer)?.same_slot_lease_execution(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_reply);

        rpc_reply.map(|_| ()).map_err(PeerError::from)
    }

    async fn suspicion(&self, peer: ParticipantIndex, input: SuspicionInput) -> Result<SuspicionOutput, PeerError> {
        let rpc_request = ProtoSuspicionReq {
            suspect: input.suspect.into_inner(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_request);
        let rpc_reply = self.client(peer)?.suspicion(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", peer, rpc_reply);

        Ok(SuspicionOutput {
            suspected: rpc_reply?.into_inner().suspected,
        })
    }
}

/// Calls from a transaction manager to every lease manager in the roster over gRPC.
pub(crate) struct GrpcLeaseManagers {
    logger: slog::Logger,
    clients: Vec<GrpcLeaseManagerClient<Channel>>,
}

impl GrpcLeaseManagers {
    pub(crate) fn new(logger: slog::Logger, roster: &Roster) -> Result<Self, PeerError> {
        let mut clients = Vec::with_capacity(roster.len());
        for member in roster.members() {
            clients.push(GrpcLeaseManagerClient::new(lazy_channel(member.addr)?));
        }

        Ok(GrpcLeaseManagers { logger, clients })
    }

    fn client(&self, index: ParticipantIndex) -> Result<GrpcLeaseManagerClient<Channel>, PeerError> {
        self.clients
            .get(index.as_usize())
            .cloned()
            .ok_or(PeerError::UnknownParticipant(index))
    }
}

#[async_trait::async_trait]
impl LeaseManagers for GrpcLeaseManagers {
    async fn lease_request(&self, lease_manager: ParticipantIndex, input: LeaseRequestInput) -> Result<(), PeerError> {
        let rpc_request = ProtoLeaseRequestReq {
            slot: input.slot.as_u64(),
            lease: Some(ProtoLease::from(input.lease)),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", lease_manager, rpc_request);
        let rpc_reply = self.client(lease_manager)?.lease_request(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", lease_manager, rpc_reply);

        rpc_reply.map(|_| ()).map_err(PeerError::from)
    }

    async fn status_update(&self, lease_manager: ParticipantIndex) -> Result<StatusUpdateOutput, PeerError> {
        let rpc_request = ProtoStatusUpdateReq {};

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", lease_manager, rpc_request);
        let rpc_reply = self.client(lease_manager)?.status_update(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", lease_manager, rpc_reply);

        Ok(StatusUpdateOutput {
            decided: rpc_reply?
                .into_inner()
                .decided
                .into_iter()
                .map(DecidedSlot::from)
                .collect(),
        })
    }
}
