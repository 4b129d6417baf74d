mod lease_manager_server;
mod shutdown;
mod transaction_manager_server;

pub(crate) use lease_manager_server::LeaseManagerRpcServer;
pub(crate) use shutdown::shutdown_signal;
pub(crate) use shutdown::ServerShutdownHandle;
pub(crate) use shutdown::ServerShutdownSignal;
pub(crate) use transaction_manager_server::TransactionManagerRpcServer;
