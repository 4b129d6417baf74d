use crate::grpc::grpc_lease_manager_client::GrpcLeaseManagerClient;
use crate::grpc::grpc_transaction_manager_client::GrpcTransactionManagerClient;
use crate::grpc::{
    proto_tx_submit_error, proto_tx_submit_result, ProtoKeyValue, ProtoStatusReq, ProtoStatusResult,
    ProtoTxSubmitReq,
};
use crate::transaction_manager::KeyValue;
use std::net::SocketAddr;
use tonic::transport::{Channel, Endpoint};

/// TkvClient submits transactions to one transaction manager over gRPC.
#[derive(Clone)]
pub struct TkvClient {
    logger: slog::Logger,
    client_id: String,
    client: GrpcTransactionManagerClient<Channel>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransactionInput {
    pub reads: Vec<String>,
    pub writes: Vec<KeyValue>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionOutput {
    /// Values of the read keys at commit time. Keys that were never written are left out.
    pub values_read: Vec<KeyValue>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerStatus {
    pub alive: bool,
    pub slot: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
    // The transaction manager adopted a newer log before the transaction committed. Safe to
    // resubmit.
    #[error("Transaction was discarded")]
    Discarded,
    #[error("Server fault: {0}")]
    ServerFault(String),
    #[error("Server sent a malformed reply")]
    MalformedReply,
}

impl TkvClient {
    /// Connects lazily, so the transaction manager doesn't need to be up yet.
    pub fn new(logger: slog::Logger, client_id: impl Into<String>, addr: SocketAddr) -> Result<Self, ClientError> {
        Ok(TkvClient {
            logger,
            client_id: client_id.into(),
            client: GrpcTransactionManagerClient::new(lazy_endpoint(addr)?),
        })
    }

    /// Blocks until the transaction commits, which takes at least one slot if the transaction
    /// manager has to request leases first.
    pub async fn tx_submit(&self, input: TransactionInput) -> Result<TransactionOutput, ClientError> {
        let rpc_request = ProtoTxSubmitReq {
            client_id: self.client_id.clone(),
            reads: input.reads,
            writes: input.writes.into_iter().map(ProtoKeyValue::from).collect(),
        };

        slog::debug!(self.logger, "ClientWire - {:?}", rpc_request);
        let rpc_reply = self.client.clone().tx_submit(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?}", rpc_reply);

        let result = rpc_reply?.into_inner().result.ok_or(ClientError::MalformedReply)?;
        match result {
            proto_tx_submit_result::Result::Ok(success) => Ok(TransactionOutput {
                values_read: success.values_read.into_iter().map(KeyValue::from).collect(),
            }),
            proto_tx_submit_result::Result::Err(error) => match error.err {
                Some(proto_tx_submit_error::Err::Discarded(_)) => Err(ClientError::Discarded),
                Some(proto_tx_submit_error::Err::ServerFault(fault)) => Err(ClientError::ServerFault(fault.message)),
                None => Err(ClientError::MalformedReply),
            },
        }
    }

    /// Waits while the transaction manager is crashed.
    pub async fn status(&self) -> Result<ServerStatus, ClientError> {
        let rpc_request = ProtoStatusReq {};

        slog::debug!(self.logger, "ClientWire - {:?}", rpc_request);
        let rpc_reply = self.client.clone().status(rpc_request).await;
        slog::debug!(self.logger, "ClientWire - {:?}", rpc_reply);

        Ok(ServerStatus::from(rpc_reply?.into_inner()))
    }
}

/// Liveness and current slot of a lease manager.
pub async fn lease_manager_status(logger: &slog::Logger, addr: SocketAddr) -> Result<ServerStatus, ClientError> {
    let mut client = GrpcLeaseManagerClient::new(lazy_endpoint(addr)?);
    let rpc_request = ProtoStatusReq {};

    slog::debug!(logger, "ClientWire - {:?} - {:?}", addr, rpc_request);
    let rpc_reply = client.status(rpc_request).await;
    slog::debug!(logger, "ClientWire - {:?} - {:?}", addr, rpc_reply);

    Ok(ServerStatus::from(rpc_reply?.into_inner()))
}

fn lazy_endpoint(addr: SocketAddr) -> Result<Channel, ClientError> {
    let endpoint =
        Endpoint::from_shared(format!("http://{}", addr)).map_err(|e| ClientError::Connect(e.to_string()))?;

    endpoint.connect_lazy().map_err(|e| ClientError::Connect(e.to_string()))
}

impl From<ProtoStatusResult> for ServerStatus {
    fn from(proto: ProtoStatusResult) -> Self {
        ServerStatus {
            alive: proto.alive,
            slot: proto.slot,
        }
    }
}
