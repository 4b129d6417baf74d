use crate::cluster::{ParticipantIndex, Roster, Slot};
use crate::grpc::grpc_paxos_client::GrpcPaxosClient;
use crate::grpc::{ProtoAcceptReq, ProtoDecideReq, ProtoLease, ProtoPrepareReq};
use crate::lease::Lease;
use crate::lease_manager::{AcceptInput, AcceptOutput, Ballot, DecideInput, PaxosPeers, PrepareInput, PromiseOutput};
use crate::quorum::{lazy_channel, PeerError};
use tonic::transport::Channel;

/// Paxos calls to every lease manager in the roster, ourselves included, over gRPC.
pub(crate) struct GrpcPaxosPeers {
    logger: slog::Logger,
    clients: Vec<GrpcPaxosClient<Channel>>,
}

impl GrpcPaxosPeers {
    pub(crate) fn new(logger: slog::Logger, roster: &Roster) -> Result<Self, PeerError> {
        let mut clients = Vec::with_capacity(roster.len());
        for member in roster.members() {
            clients.push(GrpcPaxosClient::new(lazy_channel(member.addr)?));
        }

        Ok(GrpcPaxosPeers { logger, clients })
    }

    fn client(&self, index: ParticipantIndex) -> Result<GrpcPaxosClient<Channel>, PeerError> {
        self.clients
            .get(index.as_usize())
            .cloned()
            .ok_or(PeerError::UnknownParticipant(index))
    }
}

#[async_trait::async_trait]
impl PaxosPeers for GrpcPaxosPeers {
    async fn prepare(&self, acceptor: ParticipantIndex, input: PrepareInput) -> Result<PromiseOutput, PeerError> {
        let rpc_request = ProtoPrepareReq {
            slot: input.slot.as_u64(),
            ballot_round: input.ballot.round().as_u64(),
            ballot_proposer: input.ballot.proposer().as_u32(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", acceptor, rpc_request);
        let rpc_reply = self.client(acceptor)?.prepare(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", acceptor, rpc_reply);

        let promise = rpc_reply?.into_inner();
        Ok(PromiseOutput {
            read_timestamp: ballot(promise.read_round, promise.read_proposer),
            write_timestamp: ballot(promise.write_round, promise.write_proposer),
            written_values: leases(promise.written_values),
        })
    }

    async fn accept(&self, acceptor: ParticipantIndex, input: AcceptInput) -> Result<AcceptOutput, PeerError> {
        let rpc_request = ProtoAcceptReq {
            slot: input.slot.as_u64(),
            ballot_round: input.ballot.round().as_u64(),
            ballot_proposer: input.ballot.proposer().as_u32(),
            leases: input.leases.into_iter().map(ProtoLease::from).collect(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", acceptor, rpc_request);
        let rpc_reply = self.client(acceptor)?.accept(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", acceptor, rpc_reply);

        Ok(AcceptOutput {
            accepted: rpc_reply?.into_inner().accepted,
        })
    }

    async fn decide(&self, learner: ParticipantIndex, input: DecideInput) -> Result<(), PeerError> {
        let rpc_request = ProtoDecideReq {
            slot: input.slot.as_u64(),
            acceptor: input.acceptor.as_u32(),
            write_round: input.write_timestamp.round().as_u64(),
            write_proposer: input.write_timestamp.proposer().as_u32(),
            leases: input.leases.into_iter().map(ProtoLease::from).collect(),
        };

        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", learner, rpc_request);
        let rpc_reply = self.client(learner)?.decide(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?} - {:?}", learner, rpc_reply);

        rpc_reply.map(|_| ()).map_err(PeerError::from)
    }
}

fn ballot(round: u64, proposer: u32) -> Ballot {
    Ballot::new(Slot::new(round), ParticipantIndex::new(proposer))
}

fn leases(proto: Vec<ProtoLease>) -> Vec<Lease> {
    proto.into_iter().map(Lease::from).collect()
}
