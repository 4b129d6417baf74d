use crate::api::options::SlotOptionsValidated;
use crate::cluster::{Member, ParticipantId, Roster, SlotSchedule};
use crate::lease_manager::{
    GrpcPaxosPeers, LeaseManager, LeaseManagerActor, LeaseManagerClient, LeaseManagerConfig, LeaseManagerDriver,
    LeaseManagerStatus,
};
use crate::server::{LeaseManagerRpcServer, ServerShutdownHandle, TransactionManagerRpcServer};
use crate::timer::SlotTimerHandle;
use crate::transaction_manager::{
    GrpcLeaseManagers, GrpcTransactionManagerPeers, TransactionCoordinator, TransactionManager,
    TransactionManagerActor, TransactionManagerClient, TransactionManagerConfig, TransactionManagerStatus,
};
use crate::{server, SlotOptions};
use std::collections::HashSet;
use std::convert::TryFrom;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Instant;

/// A server process, lease manager or transaction manager, as listed in the cluster config.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemberInfo {
    pub id: String,
    pub addr: SocketAddr,
}

pub struct ServerConfig {
    pub my_id: String,
    pub lease_managers: Vec<MemberInfo>,
    pub transaction_managers: Vec<MemberInfo>,
    pub schedule: SlotSchedule,
    pub logger: slog::Logger,
    pub options: SlotOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error("Invalid cluster info: {0}")]
    InvalidClusterInfo(String),
    #[error("Illegal options for configuring server: {0}")]
    IllegalOptions(String),
    #[error("my ID {0} is not a server in the cluster config")]
    MeNotInCluster(String),
}

#[derive(Debug, thiserror::Error)]
#[error("server has shut down")]
pub struct ServerExitedError;

/// A running server. Dropping it stops the slot clock and the RPC server.
pub enum TkvServer {
    LeaseManager(LeaseManagerHandle),
    TransactionManager(TransactionManagerHandle),
}

impl TkvServer {
    pub fn shutdown(self) {
        match self {
            TkvServer::LeaseManager(handle) => handle.shutdown(),
            TkvServer::TransactionManager(handle) => handle.shutdown(),
        }
    }
}

pub struct LeaseManagerHandle {
    actor_client: LeaseManagerClient,
    _slot_timer: SlotTimerHandle,
    server_shutdown: ServerShutdownHandle,
}

impl LeaseManagerHandle {
    pub async fn status(&self) -> Result<LeaseManagerStatus, ServerExitedError> {
        self.actor_client.status().await.map_err(|_| ServerExitedError)
    }

    /// Stop serving RPCs. The slot clock stops with the handle.
    pub fn shutdown(self) {
        self.server_shutdown.shutdown();
    }
}

pub struct TransactionManagerHandle {
    actor_client: TransactionManagerClient,
    _slot_timer: SlotTimerHandle,
    server_shutdown: ServerShutdownHandle,
}

impl TransactionManagerHandle {
    /// Answered even while the schedule has this transaction manager crashed.
    pub async fn status(&self) -> Result<TransactionManagerStatus, ServerExitedError> {
        self.actor_client.snapshot().await.map_err(|_| ServerExitedError)
    }

    /// Stop serving RPCs. The slot clock stops with the handle.
    pub fn shutdown(self) {
        self.server_shutdown.shutdown();
    }
}

/// Start whichever role `config.my_id` has in the cluster. Must be called from within a tokio
/// runtime.
pub async fn try_create_server(config: ServerConfig) -> Result<TkvServer, CreationError> {
    validate_cluster(&config)?;

    if config.lease_managers.iter().any(|m| m.id == config.my_id) {
        try_create_lease_manager(config).await.map(TkvServer::LeaseManager)
    } else if config.transaction_managers.iter().any(|m| m.id == config.my_id) {
        try_create_transaction_manager(config)
            .await
            .map(TkvServer::TransactionManager)
    } else {
        Err(CreationError::MeNotInCluster(config.my_id))
    }
}

pub async fn try_create_lease_manager(config: ServerConfig) -> Result<LeaseManagerHandle, CreationError> {
    validate_cluster(&config)?;
    let options = SlotOptionsValidated::try_from(config.options)
        .map_err(|e| CreationError::IllegalOptions(e.to_string()))?;

    let root_logger = config.logger;
    let roster = to_roster(config.lease_managers);
    let my_id = ParticipantId::new(config.my_id);
    let my_index = roster
        .index_of(&my_id)
        .ok_or_else(|| CreationError::MeNotInCluster(my_id.clone().into_inner()))?;
    let my_server_addr = member_addr(&roster, &my_id)?;
    let schedule = Arc::new(config.schedule);
    let slot_duration = schedule.slot_duration();

    let peers = Arc::new(
        GrpcPaxosPeers::new(root_logger.clone(), &roster)
            .map_err(|e| CreationError::InvalidClusterInfo(e.to_string()))?,
    );
    let majority = roster.majority();

    let lease_manager = LeaseManager::new(LeaseManagerConfig {
        logger: root_logger.clone(),
        my_index,
        roster,
        schedule,
        peers: peers.clone(),
    })
    .map_err(|e| CreationError::InvalidClusterInfo(e.to_string()))?;

    let (actor_client, actor_queue_rx) = LeaseManagerClient::new(options.actor_queue_size);
    let actor = LeaseManagerActor::new(root_logger.clone(), actor_queue_rx, lease_manager);
    tokio::spawn(actor.run_event_loop());

    let (server_shutdown_handle, server_shutdown_signal) = server::shutdown_signal();
    let rpc_server = LeaseManagerRpcServer::new(root_logger.clone(), actor_client.clone());
    tokio::spawn(rpc_server.run(my_server_addr, server_shutdown_signal));

    let driver = LeaseManagerDriver::new(root_logger.clone(), actor_client.clone(), peers, majority);
    let slot_timer = SlotTimerHandle::spawn_timer_task(
        root_logger,
        Instant::now() + options.start_delay,
        slot_duration,
        driver,
    );

    Ok(LeaseManagerHandle {
        actor_client,
        _slot_timer: slot_timer,
        server_shutdown: server_shutdown_handle,
    })
}

pub async fn try_create_transaction_manager(
    config: ServerConfig,
) -> Result<TransactionManagerHandle, CreationError> {
    validate_cluster(&config)?;
    let options = SlotOptionsValidated::try_from(config.options)
        .map_err(|e| CreationError::IllegalOptions(e.to_string()))?;

    let root_logger = config.logger;
    let roster = to_roster(config.transaction_managers);
    let lease_manager_roster = to_roster(config.lease_managers);
    let my_id = ParticipantId::new(config.my_id);
    let my_index = roster
        .index_of(&my_id)
        .ok_or_else(|| CreationError::MeNotInCluster(my_id.clone().into_inner()))?;
    let my_server_addr = member_addr(&roster, &my_id)?;
    let schedule = Arc::new(config.schedule);
    let slot_duration = schedule.slot_duration();

    let peers = Arc::new(
        GrpcTransactionManagerPeers::new(root_logger.clone(), &roster)
            .map_err(|e| CreationError::InvalidClusterInfo(e.to_string()))?,
    );
    let lease_managers = Arc::new(
        GrpcLeaseManagers::new(root_logger.clone(), &lease_manager_roster)
            .map_err(|e| CreationError::InvalidClusterInfo(e.to_string()))?,
    );
    let majority = roster.majority();

    let transaction_manager = TransactionManager::new(TransactionManagerConfig {
        logger: root_logger.clone(),
        my_index,
        roster,
        lease_manager_roster,
        schedule,
        lease_managers: lease_managers.clone(),
    })
    .map_err(|e| CreationError::InvalidClusterInfo(e.to_string()))?;

    let (actor_client, actor_queue_rx) = TransactionManagerClient::new(options.actor_queue_size);
    let actor = TransactionManagerActor::new(root_logger.clone(), actor_queue_rx, transaction_manager);
    tokio::spawn(actor.run_event_loop());

    let (server_shutdown_handle, server_shutdown_signal) = server::shutdown_signal();
    let rpc_server = TransactionManagerRpcServer::new(root_logger.clone(), actor_client.clone());
    tokio::spawn(rpc_server.run(my_server_addr, server_shutdown_signal));

    let coordinator = TransactionCoordinator::new(
        root_logger.clone(),
        actor_client.clone(),
        peers,
        lease_managers,
        my_id,
        my_index,
        majority,
    );
    let slot_timer = SlotTimerHandle::spawn_timer_task(
        root_logger,
        Instant::now() + options.start_delay,
        slot_duration,
        coordinator,
    );

    Ok(TransactionManagerHandle {
        actor_client,
        _slot_timer: slot_timer,
        server_shutdown: server_shutdown_handle,
    })
}

fn validate_cluster(config: &ServerConfig) -> Result<(), CreationError> {
    if config.lease_managers.is_empty() {
        return Err(CreationError::InvalidClusterInfo("no lease managers".into()));
    }
    if config.transaction_managers.is_empty() {
        return Err(CreationError::InvalidClusterInfo("no transaction managers".into()));
    }
    if config.schedule.slot_duration().as_millis() == 0 {
        return Err(CreationError::IllegalOptions("slot duration must be positive".into()));
    }

    let mut ids = HashSet::new();
    for member in config.lease_managers.iter().chain(config.transaction_managers.iter()) {
        if !ids.insert(member.id.as_str()) {
            return Err(CreationError::InvalidClusterInfo(format!(
                "{} is listed more than once",
                member.id
            )));
        }
    }

    Ok(())
}

fn to_roster(members: Vec<MemberInfo>) -> Roster {
    Roster::new(
        members
            .into_iter()
            .map(|m| Member {
                id: ParticipantId::new(m.id),
                addr: m.addr,
            })
            .collect(),
    )
}

fn member_addr(roster: &Roster, id: &ParticipantId) -> Result<SocketAddr, CreationError> {
    roster
        .index_of(id)
        .and_then(|index| roster.member(index))
        .map(|member| member.addr)
        .ok_or_else(|| CreationError::MeNotInCluster(id.as_str().to_string()))
}
