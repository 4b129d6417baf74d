#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLease {
    #[prost(string, tag = "1")]
    pub owner: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub permissions: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoKeyValue {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub value: i64,
}
/// Ballot (0, 0) means "none".
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPrepareReq {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(uint64, tag = "2")]
    pub ballot_round: u64,
    #[prost(uint32, tag = "3")]
    pub ballot_proposer: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPromise {
    #[prost(uint64, tag = "1")]
    pub read_round: u64,
    #[prost(uint32, tag = "2")]
    pub read_proposer: u32,
    #[prost(uint64, tag = "3")]
    pub write_round: u64,
    #[prost(uint32, tag = "4")]
    pub write_proposer: u32,
    #[prost(message, repeated, tag = "5")]
    pub written_values: ::prost::alloc::vec::Vec<ProtoLease>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAcceptReq {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(uint64, tag = "2")]
    pub ballot_round: u64,
    #[prost(uint32, tag = "3")]
    pub ballot_proposer: u32,
    #[prost(message, repeated, tag = "4")]
    pub leases: ::prost::alloc::vec::Vec<ProtoLease>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAccepted {
    #[prost(bool, tag = "1")]
    pub accepted: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDecideReq {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(uint32, tag = "2")]
    pub acceptor: u32,
    #[prost(uint64, tag = "3")]
    pub write_round: u64,
    #[prost(uint32, tag = "4")]
    pub write_proposer: u32,
    #[prost(message, repeated, tag = "5")]
    pub leases: ::prost::alloc::vec::Vec<ProtoLease>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDecideAck {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLeaseRequestReq {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(message, optional, tag = "2")]
    pub lease: ::core::option::Option<ProtoLease>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLeaseRequestAck {}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStatusUpdateReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDecidedSlot {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(message, repeated, tag = "2")]
    pub leases: ::prost::alloc::vec::Vec<ProtoLease>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStatusUpdateResult {
    #[prost(message, repeated, tag = "1")]
    pub decided: ::prost::alloc::vec::Vec<ProtoDecidedSlot>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStatusReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStatusResult {
    #[prost(bool, tag = "1")]
    pub alive: bool,
    #[prost(uint64, tag = "2")]
    pub slot: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxPrepareReq {
    #[prost(string, tag = "1")]
    pub coordinator: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub tx_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub slot: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxPrepareVote {
    #[prost(bool, tag = "1")]
    pub vote: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxCommitReq {
    #[prost(string, tag = "1")]
    pub coordinator: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub tx_id: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub writes: ::prost::alloc::vec::Vec<ProtoKeyValue>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxCommitAck {}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoUpdateReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoUpdateResult {
    #[prost(message, repeated, tag = "1")]
    pub write_log: ::prost::alloc::vec::Vec<ProtoKeyValue>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSameSlotLeaseExecutionReq {
    #[prost(uint64, tag = "1")]
    pub slot: u64,
    #[prost(message, optional, tag = "2")]
    pub lease: ::core::option::Option<ProtoLease>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSameSlotLeaseExecutionAck {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSuspicionReq {
    #[prost(string, tag = "1")]
    pub suspect: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSuspicionResult {
    #[prost(bool, tag = "1")]
    pub suspected: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxSubmitReq {
    #[prost(string, tag = "1")]
    pub client_id: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub reads: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "3")]
    pub writes: ::prost::alloc::vec::Vec<ProtoKeyValue>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxSubmitResult {
    #[prost(oneof = "proto_tx_submit_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_tx_submit_result::Result>,
}
/// Nested message and enum types in `ProtoTxSubmitResult`.
pub mod proto_tx_submit_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoTxSubmitSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoTxSubmitError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxSubmitSuccess {
    #[prost(message, repeated, tag = "1")]
    pub values_read: ::prost::alloc::vec::Vec<ProtoKeyValue>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxSubmitError {
    #[prost(oneof = "proto_tx_submit_error::Err", tags = "1, 2")]
    pub err: ::core::option::Option<proto_tx_submit_error::Err>,
}
/// Nested message and enum types in `ProtoTxSubmitError`.
pub mod proto_tx_submit_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        Discarded(super::ProtoTxDiscarded),
        #[prost(message, tag = "2")]
        ServerFault(super::ProtoServerFault),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTxDiscarded {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoServerFault {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
#[doc = r" Generated client implementations."]
pub mod grpc_paxos_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Paxos roles colocated on every lease manager."]
    pub struct GrpcPaxosClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcPaxosClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcPaxosClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn prepare(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoPrepareReq>,
        ) -> Result<tonic::Response<super::ProtoPromise>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcPaxos/Prepare");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn accept(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoAcceptReq>,
        ) -> Result<tonic::Response<super::ProtoAccepted>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcPaxos/Accept");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn decide(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoDecideReq>,
        ) -> Result<tonic::Response<super::ProtoDecideAck>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcPaxos/Decide");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcPaxosClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcPaxosClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcPaxosClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_lease_manager_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Lease manager surface used by transaction managers and clients."]
    pub struct GrpcLeaseManagerClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcLeaseManagerClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcLeaseManagerClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn lease_request(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoLeaseRequestReq>,
        ) -> Result<tonic::Response<super::ProtoLeaseRequestAck>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcLeaseManager/LeaseRequest");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn status_update(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoStatusUpdateReq>,
        ) -> Result<tonic::Response<super::ProtoStatusUpdateResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcLeaseManager/StatusUpdate");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn status(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoStatusReq>,
        ) -> Result<tonic::Response<super::ProtoStatusResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcLeaseManager/Status");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcLeaseManagerClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcLeaseManagerClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcLeaseManagerClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_transaction_manager_peer_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Transaction manager to transaction manager."]
    pub struct GrpcTransactionManagerPeerClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcTransactionManagerPeerClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcTransactionManagerPeerClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn prepare(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoTxPrepareReq>,
        ) -> Result<tonic::Response<super::ProtoTxPrepareVote>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManagerPeer/Prepare");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn commit(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoTxCommitReq>,
        ) -> Result<tonic::Response<super::ProtoTxCommitAck>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManagerPeer/Commit");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn update(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoUpdateReq>,
        ) -> Result<tonic::Response<super::ProtoUpdateResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManagerPeer/Update");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn same_slot_lease_execution(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoSameSlotLeaseExecutionReq>,
        ) -> Result<tonic::Response<super::ProtoSameSlotLeaseExecutionAck>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/tkv.GrpcTransactionManagerPeer/SameSlotLeaseExecution",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn suspicion(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoSuspicionReq>,
        ) -> Result<tonic::Response<super::ProtoSuspicionResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManagerPeer/Suspicion");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcTransactionManagerPeerClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcTransactionManagerPeerClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcTransactionManagerPeerClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_transaction_manager_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Client to transaction manager."]
    pub struct GrpcTransactionManagerClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcTransactionManagerClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcTransactionManagerClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn tx_submit(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoTxSubmitReq>,
        ) -> Result<tonic::Response<super::ProtoTxSubmitResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManager/TxSubmit");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn status(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoStatusReq>,
        ) -> Result<tonic::Response<super::ProtoStatusResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tkv.GrpcTransactionManager/Status");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcTransactionManagerClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcTransactionManagerClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcTransactionManagerClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_paxos_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcPaxosServer."]
    #[async_trait]
    pub trait GrpcPaxos: Send + Sync + 'static {
        async fn prepare(
            &self,
            request: tonic::Request<super::ProtoPrepareReq>,
        ) -> Result<tonic::Response<super::ProtoPromise>, tonic::Status>;
        async fn accept(
            &self,
            request: tonic::Request<super::ProtoAcceptReq>,
        ) -> Result<tonic::Response<super::ProtoAccepted>, tonic::Status>;
        async fn decide(
            &self,
            request: tonic::Request<super::ProtoDecideReq>,
        ) -> Result<tonic::Response<super::ProtoDecideAck>, tonic::Status>;
    }
    #[doc = " Paxos roles colocated on every lease manager."]
    #[derive(Debug)]
    pub struct GrpcPaxosServer<T: GrpcPaxos> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcPaxos> GrpcPaxosServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcPaxosServer<T>
    where
        T: GrpcPaxos,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/tkv.GrpcPaxos/Prepare" => {
                    #[allow(non_camel_case_types)]
                    struct PrepareSvc<T: GrpcPaxos>(pub Arc<T>);
                    impl<T: GrpcPaxos> tonic::server::UnaryService<super::ProtoPrepareReq> for PrepareSvc<T> {
                        type Response = super::ProtoPromise;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoPrepareReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).prepare(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = PrepareSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcPaxos/Accept" => {
                    #[allow(non_camel_case_types)]
                    struct AcceptSvc<T: GrpcPaxos>(pub Arc<T>);
                    impl<T: GrpcPaxos> tonic::server::UnaryService<super::ProtoAcceptReq> for AcceptSvc<T> {
                        type Response = super::ProtoAccepted;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoAcceptReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).accept(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = AcceptSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcPaxos/Decide" => {
                    #[allow(non_camel_case_types)]
                    struct DecideSvc<T: GrpcPaxos>(pub Arc<T>);
                    impl<T: GrpcPaxos> tonic::server::UnaryService<super::ProtoDecideReq> for DecideSvc<T> {
                        type Response = super::ProtoDecideAck;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoDecideReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).decide(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = DecideSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcPaxos> Clone for GrpcPaxosServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcPaxos> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcPaxos> tonic::transport::NamedService for GrpcPaxosServer<T> {
        const NAME: &'static str = "tkv.GrpcPaxos";
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_lease_manager_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcLeaseManagerServer."]
    #[async_trait]
    pub trait GrpcLeaseManager: Send + Sync + 'static {
        async fn lease_request(
            &self,
            request: tonic::Request<super::ProtoLeaseRequestReq>,
        ) -> Result<tonic::Response<super::ProtoLeaseRequestAck>, tonic::Status>;
        async fn status_update(
            &self,
            request: tonic::Request<super::ProtoStatusUpdateReq>,
        ) -> Result<tonic::Response<super::ProtoStatusUpdateResult>, tonic::Status>;
        async fn status(
            &self,
            request: tonic::Request<super::ProtoStatusReq>,
        ) -> Result<tonic::Response<super::ProtoStatusResult>, tonic::Status>;
    }
    #[doc = " Lease manager surface used by transaction managers and clients."]
    #[derive(Debug)]
    pub struct GrpcLeaseManagerServer<T: GrpcLeaseManager> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcLeaseManager> GrpcLeaseManagerServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcLeaseManagerServer<T>
    where
        T: GrpcLeaseManager,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/tkv.GrpcLeaseManager/LeaseRequest" => {
                    #[allow(non_camel_case_types)]
                    struct LeaseRequestSvc<T: GrpcLeaseManager>(pub Arc<T>);
                    impl<T: GrpcLeaseManager>
                        tonic::server::UnaryService<super::ProtoLeaseRequestReq>
                        for LeaseRequestSvc<T>
                    {
                        type Response = super::ProtoLeaseRequestAck;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoLeaseRequestReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).lease_request(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = LeaseRequestSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcLeaseManager/StatusUpdate" => {
                    #[allow(non_camel_case_types)]
                    struct StatusUpdateSvc<T: GrpcLeaseManager>(pub Arc<T>);
                    impl<T: GrpcLeaseManager>
                        tonic::server::UnaryService<super::ProtoStatusUpdateReq>
                        for StatusUpdateSvc<T>
                    {
                        type Response = super::ProtoStatusUpdateResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoStatusUpdateReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).status_update(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = StatusUpdateSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcLeaseManager/Status" => {
                    #[allow(non_camel_case_types)]
                    struct StatusSvc<T: GrpcLeaseManager>(pub Arc<T>);
                    impl<T: GrpcLeaseManager> tonic::server::UnaryService<super::ProtoStatusReq> for StatusSvc<T> {
                        type Response = super::ProtoStatusResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoStatusReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).status(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = StatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcLeaseManager> Clone for GrpcLeaseManagerServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcLeaseManager> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcLeaseManager> tonic::transport::NamedService for GrpcLeaseManagerServer<T> {
        const NAME: &'static str = "tkv.GrpcLeaseManager";
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_transaction_manager_peer_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcTransactionManagerPeerServer."]
    #[async_trait]
    pub trait GrpcTransactionManagerPeer: Send + Sync + 'static {
        async fn prepare(
            &self,
            request: tonic::Request<super::ProtoTxPrepareReq>,
        ) -> Result<tonic::Response<super::ProtoTxPrepareVote>, tonic::Status>;
        async fn commit(
            &self,
            request: tonic::Request<super::ProtoTxCommitReq>,
        ) -> Result<tonic::Response<super::ProtoTxCommitAck>, tonic::Status>;
        async fn update(
            &self,
            request: tonic::Request<super::ProtoUpdateReq>,
        ) -> Result<tonic::Response<super::ProtoUpdateResult>, tonic::Status>;
        async fn same_slot_lease_execution(
            &self,
            request: tonic::Request<super::ProtoSameSlotLeaseExecutionReq>,
        ) -> Result<tonic::Response<super::ProtoSameSlotLeaseExecutionAck>, tonic::Status>;
        async fn suspicion(
            &self,
            request: tonic::Request<super::ProtoSuspicionReq>,
        ) -> Result<tonic::Response<super::ProtoSuspicionResult>, tonic::Status>;
    }
    #[doc = " Transaction manager to transaction manager."]
    #[derive(Debug)]
    pub struct GrpcTransactionManagerPeerServer<T: GrpcTransactionManagerPeer> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcTransactionManagerPeer> GrpcTransactionManagerPeerServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcTransactionManagerPeerServer<T>
    where
        T: GrpcTransactionManagerPeer,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/tkv.GrpcTransactionManagerPeer/Prepare" => {
                    #[allow(non_camel_case_types)]
                    struct PrepareSvc<T: GrpcTransactionManagerPeer>(pub Arc<T>);
                    impl<T: GrpcTransactionManagerPeer>
                        tonic::server::UnaryService<super::ProtoTxPrepareReq> for PrepareSvc<T>
                    {
                        type Response = super::ProtoTxPrepareVote;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoTxPrepareReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).prepare(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = PrepareSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcTransactionManagerPeer/Commit" => {
                    #[allow(non_camel_case_types)]
                    struct CommitSvc<T: GrpcTransactionManagerPeer>(pub Arc<T>);
                    impl<T: GrpcTransactionManagerPeer>
                        tonic::server::UnaryService<super::ProtoTxCommitReq> for CommitSvc<T>
                    {
                        type Response = super::ProtoTxCommitAck;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoTxCommitReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).commit(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = CommitSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcTransactionManagerPeer/Update" => {
                    #[allow(non_camel_case_types)]
                    struct UpdateSvc<T: GrpcTransactionManagerPeer>(pub Arc<T>);
                    impl<T: GrpcTransactionManagerPeer>
                        tonic::server::UnaryService<super::ProtoUpdateReq> for UpdateSvc<T>
                    {
                        type Response = super::ProtoUpdateResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoUpdateReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).update(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = UpdateSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcTransactionManagerPeer/SameSlotLeaseExecution" => {
                    #[allow(non_camel_case_types)]
                    struct SameSlotLeaseExecutionSvc<T: GrpcTransactionManagerPeer>(pub Arc<T>);
                    impl<T: GrpcTransactionManagerPeer>
                        tonic::server::UnaryService<super::ProtoSameSlotLeaseExecutionReq>
                        for SameSlotLeaseExecutionSvc<T>
                    {
                        type Response = super::ProtoSameSlotLeaseExecutionAck;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoSameSlotLeaseExecutionReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut =
                                async move { (*inner).same_slot_lease_execution(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = SameSlotLeaseExecutionSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcTransactionManagerPeer/Suspicion" => {
                    #[allow(non_camel_case_types)]
                    struct SuspicionSvc<T: GrpcTransactionManagerPeer>(pub Arc<T>);
                    impl<T: GrpcTransactionManagerPeer>
                        tonic::server::UnaryService<super::ProtoSuspicionReq> for SuspicionSvc<T>
                    {
                        type Response = super::ProtoSuspicionResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoSuspicionReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).suspicion(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = SuspicionSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcTransactionManagerPeer> Clone for GrpcTransactionManagerPeerServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcTransactionManagerPeer> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcTransactionManagerPeer> tonic::transport::NamedService
        for GrpcTransactionManagerPeerServer<T>
    {
        const NAME: &'static str = "tkv.GrpcTransactionManagerPeer";
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_transaction_manager_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcTransactionManagerServer."]
    #[async_trait]
    pub trait GrpcTransactionManager: Send + Sync + 'static {
        async fn tx_submit(
            &self,
            request: tonic::Request<super::ProtoTxSubmitReq>,
        ) -> Result<tonic::Response<super::ProtoTxSubmitResult>, tonic::Status>;
        async fn status(
            &self,
            request: tonic::Request<super::ProtoStatusReq>,
        ) -> Result<tonic::Response<super::ProtoStatusResult>, tonic::Status>;
    }
    #[doc = " Client to transaction manager."]
    #[derive(Debug)]
    pub struct GrpcTransactionManagerServer<T: GrpcTransactionManager> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcTransactionManager> GrpcTransactionManagerServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcTransactionManagerServer<T>
    where
        T: GrpcTransactionManager,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/tkv.GrpcTransactionManager/TxSubmit" => {
                    #[allow(non_camel_case_types)]
                    struct TxSubmitSvc<T: GrpcTransactionManager>(pub Arc<T>);
                    impl<T: GrpcTransactionManager>
                        tonic::server::UnaryService<super::ProtoTxSubmitReq> for TxSubmitSvc<T>
                    {
                        type Response = super::ProtoTxSubmitResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoTxSubmitReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).tx_submit(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = TxSubmitSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/tkv.GrpcTransactionManager/Status" => {
                    #[allow(non_camel_case_types)]
                    struct StatusSvc<T: GrpcTransactionManager>(pub Arc<T>);
                    impl<T: GrpcTransactionManager>
                        tonic::server::UnaryService<super::ProtoStatusReq> for StatusSvc<T>
                    {
                        type Response = super::ProtoStatusResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoStatusReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).status(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = StatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcTransactionManager> Clone for GrpcTransactionManagerServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcTransactionManager> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcTransactionManager> tonic::transport::NamedService for GrpcTransactionManagerServer<T> {
        const NAME: &'static str = "tkv.GrpcTransactionManager";
    }
}
