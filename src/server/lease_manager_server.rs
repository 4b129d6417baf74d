use crate::cluster::{ParticipantIndex, Slot};
use crate::grpc::grpc_lease_manager_server::{GrpcLeaseManager, GrpcLeaseManagerServer};
use crate::grpc::grpc_paxos_server::{GrpcPaxos, GrpcPaxosServer};
use crate::grpc::{
    ProtoAcceptReq, ProtoAccepted, ProtoDecideAck, ProtoDecideReq, ProtoDecidedSlot, ProtoLease,
    ProtoLeaseRequestAck, ProtoLeaseRequestReq, ProtoPrepareReq, ProtoPromise, ProtoStatusReq, ProtoStatusResult,
    ProtoStatusUpdateReq, ProtoStatusUpdateResult,
};
use crate::lease::Lease;
use crate::lease_manager::{
    AcceptInput, Ballot, DecideInput, LeaseManagerClient, LeaseManagerError, LeaseRequestInput, PrepareInput,
};
use crate::server::ServerShutdownSignal;
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// LeaseManagerRpcServer serves both the Paxos peer interface and the interface transaction
/// managers use.
#[derive(Clone)]
pub(crate) struct LeaseManagerRpcServer {
    logger: slog::Logger,
    lease_manager: LeaseManagerClient,
}

impl LeaseManagerRpcServer {
    pub(crate) fn new(logger: slog::Logger, lease_manager: LeaseManagerClient) -> Self {
        LeaseManagerRpcServer { logger, lease_manager }
    }

    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown_signal: ServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcPaxosServer::new(self.clone()))
            .add_service(GrpcLeaseManagerServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    async fn handle_prepare(&self, rpc_request: ProtoPrepareReq) -> Result<ProtoPromise, Status> {
        let app_input = PrepareInput {
            slot: Self::convert_slot(rpc_request.slot)?,
            ballot: Self::convert_ballot(rpc_request.ballot_round, rpc_request.ballot_proposer)?,
        };

        let promise = self
            .lease_manager
            .prepare(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoPromise {
            read_round: promise.read_timestamp.round().as_u64(),
            read_proposer: promise.read_timestamp.proposer().as_u32(),
            write_round: promise.write_timestamp.round().as_u64(),
            write_proposer: promise.write_timestamp.proposer().as_u32(),
            written_values: Self::convert_leases_out(promise.written_values),
        })
    }

    async fn handle_accept(&self, rpc_request: ProtoAcceptReq) -> Result<ProtoAccepted, Status> {
        let app_input = AcceptInput {
            slot: Self::convert_slot(rpc_request.slot)?,
            ballot: Self::convert_ballot(rpc_request.ballot_round, rpc_request.ballot_proposer)?,
            leases: Self::convert_leases_in(rpc_request.leases),
        };

        let accepted = self
            .lease_manager
            .accept(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoAccepted {
            accepted: accepted.accepted,
        })
    }

    async fn handle_decide(&self, rpc_request: ProtoDecideReq) -> Result<ProtoDecideAck, Status> {
        let app_input = DecideInput {
            slot: Self::convert_slot(rpc_request.slot)?,
            acceptor: ParticipantIndex::new(rpc_request.acceptor),
            write_timestamp: Self::convert_ballot(rpc_request.write_round, rpc_request.write_proposer)?,
            leases: Self::convert_leases_in(rpc_request.leases),
        };

        self.lease_manager
            .decide(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoDecideAck {})
    }

    async fn handle_lease_request(&self, rpc_request: ProtoLeaseRequestReq) -> Result<ProtoLeaseRequestAck, Status> {
        let lease = rpc_request
            .lease
            .ok_or_else(|| Status::invalid_argument("LeaseRequest without lease"))?;
        let app_input = LeaseRequestInput {
            slot: Slot::new(rpc_request.slot),
            lease: Lease::from(lease),
        };

        self.lease_manager
            .lease_request(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoLeaseRequestAck {})
    }

    async fn handle_status_update(&self) -> Result<ProtoStatusUpdateResult, Status> {
        let output = self
            .lease_manager
            .status_update()
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoStatusUpdateResult {
            decided: output.decided.into_iter().map(ProtoDecidedSlot::from).collect(),
        })
    }

    async fn handle_status(&self) -> Result<ProtoStatusResult, Status> {
        let status = self.lease_manager.status().await.map_err(Self::convert_error)?;

        Ok(ProtoStatusResult {
            alive: true,
            slot: status.slot.as_u64(),
        })
    }

    fn convert_slot(slot: u64) -> Result<Slot, Status> {
        match slot {
            0 => Err(Status::invalid_argument("Slot 0 has no consensus instance")),
            slot => Ok(Slot::new(slot)),
        }
    }

    fn convert_ballot(round: u64, proposer: u32) -> Result<Ballot, Status> {
        match (round, proposer) {
            (0, 0) => Ok(Ballot::none()),
            (0, _) => Err(Status::invalid_argument("Ballot round 0 with non-0 proposer")),
            (round, proposer) => Ok(Ballot::new(Slot::new(round), ParticipantIndex::new(proposer))),
        }
    }

    fn convert_leases_in(proto: Vec<ProtoLease>) -> Vec<Lease> {
        proto.into_iter().map(Lease::from).collect()
    }

    fn convert_leases_out(leases: Vec<Lease>) -> Vec<ProtoLease> {
        leases.into_iter().map(ProtoLease::from).collect()
    }

    fn convert_error(error: LeaseManagerError) -> Status {
        match error {
            LeaseManagerError::UnknownAcceptor(index) => {
                Status::invalid_argument(format!("Acceptor {:?} is not a lease manager", index))
            }
            LeaseManagerError::ActorExited => Status::internal("Server internal lease manager task has exited"),
        }
    }
}

#[async_trait::async_trait]
impl GrpcPaxos for LeaseManagerRpcServer {
    async fn prepare(&self, rpc_request_wrapped: Request<ProtoPrepareReq>) -> Result<Response<ProtoPromise>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_prepare(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn accept(&self, rpc_request_wrapped: Request<ProtoAcceptReq>) -> Result<Response<ProtoAccepted>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_accept(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn decide(&self, rpc_request_wrapped: Request<ProtoDecideReq>) -> Result<Response<ProtoDecideAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_decide(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }
}

#[async_trait::async_trait]
impl GrpcLeaseManager for LeaseManagerRpcServer {
    async fn lease_request(
        &self,
        rpc_request_wrapped: Request<ProtoLeaseRequestReq>,
    ) -> Result<Response<ProtoLeaseRequestAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_lease_request(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn status_update(
        &self,
        rpc_request_wrapped: Request<ProtoStatusUpdateReq>,
    ) -> Result<Response<ProtoStatusUpdateResult>, Status> {
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request_wrapped.get_ref());
        let rpc_result = self.handle_status_update().await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn status(&self, rpc_request_wrapped: Request<ProtoStatusReq>) -> Result<Response<ProtoStatusResult>, Status> {
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request_wrapped.get_ref());
        let rpc_result = self.handle_status().await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }
}
