use crate::cluster::{ParticipantId, Slot};
use crate::grpc::grpc_transaction_manager_peer_server::{
    GrpcTransactionManagerPeer, GrpcTransactionManagerPeerServer,
};
use crate::grpc::grpc_transaction_manager_server::{GrpcTransactionManager, GrpcTransactionManagerServer};
use crate::grpc::{
    proto_tx_submit_error, proto_tx_submit_result, ProtoKeyValue, ProtoSameSlotLeaseExecutionAck,
    ProtoSameSlotLeaseExecutionReq, ProtoServerFault, ProtoStatusReq, ProtoStatusResult, ProtoSuspicionReq,
    ProtoSuspicionResult, ProtoTxCommitAck, ProtoTxCommitReq, ProtoTxDiscarded, ProtoTxPrepareReq,
    ProtoTxPrepareVote, ProtoTxSubmitError, ProtoTxSubmitReq, ProtoTxSubmitResult, ProtoTxSubmitSuccess,
    ProtoUpdateReq, ProtoUpdateResult,
};
use crate::lease::Lease;
use crate::server::ServerShutdownSignal;
use crate::transaction_manager::{
    KeyValue, SameSlotLeaseExecutionInput, SuspicionInput, TransactionManagerClient, TransactionManagerError,
    TxCommitInput, TxId, TxPrepareInput, TxSubmitInput, TxSubmitOutput,
};
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// TransactionManagerRpcServer serves both the client interface and the interface other
/// transaction managers use.
#[derive(Clone)]
pub(crate) struct TransactionManagerRpcServer {
    logger: slog::Logger,
    transaction_manager: TransactionManagerClient,
}

impl TransactionManagerRpcServer {
    pub(crate) fn new(logger: slog::Logger, transaction_manager: TransactionManagerClient) -> Self {
        TransactionManagerRpcServer {
            logger,
            transaction_manager,
        }
    }

    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown_signal: ServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcTransactionManagerPeerServer::new(self.clone()))
            .add_service(GrpcTransactionManagerServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    async fn handle_tx_submit(&self, rpc_request: ProtoTxSubmitReq) -> Result<ProtoTxSubmitResult, Status> {
        let app_input = TxSubmitInput {
            client_id: rpc_request.client_id,
            reads: rpc_request.reads,
            writes: Self::convert_key_values_in(rpc_request.writes),
        };

        let app_result = self.transaction_manager.tx_submit(app_input).await;

        Ok(Self::convert_tx_submit_result(app_result))
    }

    async fn handle_status(&self) -> Result<ProtoStatusResult, Status> {
        let status = self
            .transaction_manager
            .status()
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoStatusResult {
            alive: true,
            slot: status.slot.as_u64(),
        })
    }

    async fn handle_prepare(&self, rpc_request: ProtoTxPrepareReq) -> Result<ProtoTxPrepareVote, Status> {
        let app_input = TxPrepareInput {
            coordinator: ParticipantId::new(rpc_request.coordinator),
            tx_id: TxId::new(rpc_request.tx_id),
            slot: Slot::new(rpc_request.slot),
        };

        let vote = self
            .transaction_manager
            .prepare(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoTxPrepareVote { vote: vote.vote })
    }

    async fn handle_commit(&self, rpc_request: ProtoTxCommitReq) -> Result<ProtoTxCommitAck, Status> {
        let app_input = TxCommitInput {
            coordinator: ParticipantId::new(rpc_request.coordinator),
            tx_id: TxId::new(rpc_request.tx_id),
            writes: Self::convert_key_values_in(rpc_request.writes),
        };

        self.transaction_manager
            .commit(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoTxCommitAck {})
    }

    async fn handle_update(&self) -> Result<ProtoUpdateResult, Status> {
        let output = self
            .transaction_manager
            .update()
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoUpdateResult {
            write_log: Self::convert_key_values_out(output.write_log),
        })
    }

    async fn handle_same_slot_lease_execution(
        &self,
        rpc_request: ProtoSameSlotLeaseExecutionReq,
    ) -> Result<ProtoSameSlotLeaseExecutionAck, Status> {
        let lease = rpc_request
            .lease
            .ok_or_else(|| Status::invalid_argument("SameSlotLeaseExecution without lease"))?;
        let app_input = SameSlotLeaseExecutionInput {
            slot: Slot::new(rpc_request.slot),
            lease: Lease::from(lease),
        };

        self.transaction_manager
            .same_slot_lease_execution(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoSameSlotLeaseExecutionAck {})
    }

    async fn handle_suspicion(&self, rpc_request: ProtoSuspicionReq) -> Result<ProtoSuspicionResult, Status> {
        let app_input = SuspicionInput {
            suspect: ParticipantId::new(rpc_request.suspect),
        };

        let output = self
            .transaction_manager
            .suspicion(app_input)
            .await
            .map_err(Self::convert_error)?;

        Ok(ProtoSuspicionResult {
            suspected: output.suspected,
        })
    }

    fn convert_key_values_in(proto: Vec<ProtoKeyValue>) -> Vec<KeyValue> {
        proto.into_iter().map(KeyValue::from).collect()
    }

    fn convert_key_values_out(key_values: Vec<KeyValue>) -> Vec<ProtoKeyValue> {
        key_values.into_iter().map(ProtoKeyValue::from).collect()
    }

    fn convert_tx_submit_result(app_result: Result<TxSubmitOutput, TransactionManagerError>) -> ProtoTxSubmitResult {
        let result = match app_result {
            Ok(output) => proto_tx_submit_result::Result::Ok(ProtoTxSubmitSuccess {
                values_read: Self::convert_key_values_out(output.values_read),
            }),
            Err(TransactionManagerError::Discarded) => proto_tx_submit_result::Result::Err(ProtoTxSubmitError {
                err: Some(proto_tx_submit_error::Err::Discarded(ProtoTxDiscarded {})),
            }),
            Err(e) => proto_tx_submit_result::Result::Err(ProtoTxSubmitError {
                err: Some(proto_tx_submit_error::Err::ServerFault(ProtoServerFault {
                    message: e.to_string(),
                })),
            }),
        };

        ProtoTxSubmitResult { result: Some(result) }
    }

    fn convert_error(error: TransactionManagerError) -> Status {
        match error {
            TransactionManagerError::ActorExited => {
                Status::internal("Server internal transaction manager task has exited")
            }
            e => Status::internal(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl GrpcTransactionManager for TransactionManagerRpcServer {
    async fn tx_submit(
        &self,
        rpc_request_wrapped: Request<ProtoTxSubmitReq>,
    ) -> Result<Response<ProtoTxSubmitResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_tx_submit(rpc_request).await;
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

#[async_trait::async_trait]
impl GrpcTransactionManagerPeer for TransactionManagerRpcServer {
    async fn prepare(
        &self,
        rpc_request_wrapped: Request<ProtoTxPrepareReq>,
    ) -> Result<Response<ProtoTxPrepareVote>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_prepare(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn commit(&self, rpc_request_wrapped: Request<ProtoTxCommitReq>) -> Result<Response<ProtoTxCommitAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_commit(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn update(&self, rpc_request_wrapped: Request<ProtoUpdateReq>) -> Result<Response<ProtoUpdateResult>, Status> {
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request_wrapped.get_ref());
        let rpc_result = self.handle_update().await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn same_slot_lease_execution(
        &self,
        rpc_request_wrapped: Request<ProtoSameSlotLeaseExecutionReq>,
    ) -> Result<Response<ProtoSameSlotLeaseExecutionAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_same_slot_lease_execution(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn suspicion(
        &self,
        rpc_request_wrapped: Request<ProtoSuspicionReq>,
    ) -> Result<Response<ProtoSuspicionResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_suspicion(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }
}
