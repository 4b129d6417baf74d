use crate::cluster::{localhost_roster, ParticipantId, ParticipantIndex, Slot, SlotSchedule};
use crate::lease::{DecidedSlot, Lease};
use crate::lease_manager::{
    LeaseManagerDriver, LeaseRequestInput, LocalLeaseManagerCluster, LocalPaxosPeers, StatusUpdateOutput,
};
use crate::quorum::PeerError;
use crate::test_utils::test_logger;
use crate::timer::SlotDriver;
use crate::transaction_manager::{
    ApplyStatusInput, KeyValue, LeaseManagers, SameSlotLeaseExecutionInput, SuspicionInput, SuspicionOutput,
    TransactionCoordinator, TransactionManager, TransactionManagerActor, TransactionManagerClient,
    TransactionManagerConfig, TransactionManagerError, TransactionManagerPeers, TxCommitInput, TxPrepareInput,
    TxPrepareOutput, TxSubmitInput, TxSubmitOutput, UpdateOutput,
};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn fault(e: TransactionManagerError) -> PeerError {
    PeerError::ServerFault(e.to_string())
}

/// Routes transaction manager peer calls straight to in-process actors. Calls to a disconnected
/// member fail the way an unreachable gRPC peer would.
pub(crate) struct LocalTransactionManagerPeers {
    members: Vec<TransactionManagerClient>,
    disconnected: RwLock<HashSet<ParticipantIndex>>,
}

impl LocalTransactionManagerPeers {
    fn member(&self, index: ParticipantIndex) -> Result<&TransactionManagerClient, PeerError> {
        if self.disconnected.read().unwrap().contains(&index) {
            return Err(PeerError::Connect(format!("{:?} is disconnected", index)));
        }

        self.members
            .get(index.as_usize())
            .ok_or(PeerError::UnknownParticipant(index))
    }
}

#[async_trait::async_trait]
impl TransactionManagerPeers for LocalTransactionManagerPeers {
    async fn prepare(&self, peer: ParticipantIndex, input: TxPrepareInput) -> Result<TxPrepareOutput, PeerError> {
        self.member(peer)?.prepare(input).await.map_err(fault)
    }

    async fn commit(&self, peer: ParticipantIndex, input: TxCommitInput) -> Result<(), PeerError> {
        self.member(peer)?.commit(input).await.map(|_| ()).map_err(fault)
    }

    async fn update(&self, peer: ParticipantIndex) -> Result<UpdateOutput, PeerError> {
        self.member(peer)?.update().await.map_err(fault)
    }

    async fn same_slot_lease_execution(
        &self,
        peer: ParticipantIndex,
        input: SameSlotLeaseExecutionInput,
    ) -> Result<(), PeerError> {
        self.member(peer)?
            .same_slot_lease_execution(input)
            .await
            .map(|_| ())
            .map_err(fault)
    }

    async fn suspicion(&self, peer: ParticipantIndex, input: SuspicionInput) -> Result<SuspicionOutput, PeerError> {
        self.member(peer)?.suspicion(input).await.map_err(fault)
    }
}

#[async_trait::async_trait]
impl LeaseManagers for LocalPaxosPeers {
    async fn lease_request(&self, lease_manager: ParticipantIndex, input: LeaseRequestInput) -> Result<(), PeerError> {
        self.member(lease_manager)?
            .lease_request(input)
            .await
            .map(|_| ())
            .map_err(|e| PeerError::ServerFault(e.to_string()))
    }

    async fn status_update(&self, lease_manager: ParticipantIndex) -> Result<StatusUpdateOutput, PeerError> {
        self.member(lease_manager)?
            .status_update()
            .await
            .map_err(|e| PeerError::ServerFault(e.to_string()))
    }
}

/// A transaction manager cluster of in-process actors named TM0, TM1, ...
pub(crate) struct LocalTransactionManagerCluster {
    peers: Arc<LocalTransactionManagerPeers>,
}

impl LocalTransactionManagerCluster {
    /// Transaction managers backed by a single lease manager nobody drives.
    pub(crate) fn spawn(num_members: usize) -> Self {
        Self::spawn_with_schedule(num_members, SlotSchedule::all_normal(Duration::from_secs(60)))
    }

    pub(crate) fn spawn_with_schedule(num_members: usize, schedule: SlotSchedule) -> Self {
        let lease_managers = LocalLeaseManagerCluster::spawn(1, schedule.clone());
        Self::spawn_with(num_members, Arc::new(schedule), &lease_managers)
    }

    fn spawn_with(num_members: usize, schedule: Arc<SlotSchedule>, lease_managers: &LocalLeaseManagerCluster) -> Self {
        let roster = localhost_roster("TM", num_members, 6000);
        let lease_manager_roster = localhost_roster("LM", lease_managers.len(), 5000);

        let mut clients = Vec::with_capacity(num_members);
        let mut receivers = Vec::with_capacity(num_members);
        for _ in 0..num_members {
            let (client, rx) = TransactionManagerClient::new(64);
            clients.push(client);
            receivers.push(rx);
        }

        for (index, rx) in receivers.into_iter().enumerate() {
            let logger = test_logger();
            let transaction_manager = TransactionManager::new(TransactionManagerConfig {
                logger: logger.clone(),
                my_index: ParticipantIndex::new(index as u32),
                roster: roster.clone(),
                lease_manager_roster: lease_manager_roster.clone(),
                schedule: schedule.clone(),
                lease_managers: lease_managers.peers().clone(),
            })
            .expect("index is in roster");

            tokio::spawn(TransactionManagerActor::new(logger, rx, transaction_manager).run_event_loop());
        }

        LocalTransactionManagerCluster {
            peers: Arc::new(LocalTransactionManagerPeers {
                members: clients,
                disconnected: RwLock::new(HashSet::new()),
            }),
        }
    }

    pub(crate) fn peers(&self) -> &Arc<LocalTransactionManagerPeers> {
        &self.peers
    }

    pub(crate) fn client(&self, index: u32) -> &TransactionManagerClient {
        &self.peers.members[index as usize]
    }

    pub(crate) fn disconnect(&self, index: u32) {
        self.peers
            .disconnected
            .write()
            .unwrap()
            .insert(ParticipantIndex::new(index));
    }

    pub(crate) fn reconnect(&self, index: u32) {
        self.peers
            .disconnected
            .write()
            .unwrap()
            .remove(&ParticipantIndex::new(index));
    }

    pub(crate) async fn begin_slot_all(&self) {
        for member in self.peers.members.iter() {
            member.begin_slot().await.expect("actor alive");
        }
    }

    /// Hand one member a decided slot, as if it had polled the lease managers.
    pub(crate) async fn fold(&self, index: u32, slot: u64, leases: Vec<Lease>) {
        self.client(index)
            .apply_status(ApplyStatusInput {
                decided: vec![DecidedSlot {
                    slot: Slot::new(slot),
                    leases,
                }],
            })
            .await
            .expect("actor alive");
    }
}

/// Both roles in process, each member driven by its real slot driver. Slots are run in lockstep:
/// lease managers first, then transaction managers.
pub(crate) struct LocalCluster {
    lease_managers: LocalLeaseManagerCluster,
    transaction_managers: LocalTransactionManagerCluster,
    lease_manager_drivers: Vec<LeaseManagerDriver<LocalPaxosPeers>>,
    coordinators: Vec<TransactionCoordinator<LocalTransactionManagerPeers, LocalPaxosPeers>>,
}

impl LocalCluster {
    pub(crate) fn spawn(num_lease_managers: usize, num_transaction_managers: usize, schedule: SlotSchedule) -> Self {
        let lease_managers = LocalLeaseManagerCluster::spawn(num_lease_managers, schedule.clone());
        let transaction_managers =
            LocalTransactionManagerCluster::spawn_with(num_transaction_managers, Arc::new(schedule), &lease_managers);

        let lease_manager_drivers = (0..num_lease_managers as u32)
            .map(|index| {
                LeaseManagerDriver::new(
                    test_logger(),
                    lease_managers.client(index).clone(),
                    lease_managers.peers().clone(),
                    num_lease_managers / 2 + 1,
                )
            })
            .collect();

        let coordinators = (0..num_transaction_managers as u32)
            .map(|index| {
                TransactionCoordinator::new(
                    test_logger(),
                    transaction_managers.client(index).clone(),
                    transaction_managers.peers().clone(),
                    lease_managers.peers().clone(),
                    ParticipantId::new(format!("TM{}", index)),
                    ParticipantIndex::new(index),
                    num_transaction_managers / 2 + 1,
                )
            })
            .collect();

        LocalCluster {
            lease_managers,
            transaction_managers,
            lease_manager_drivers,
            coordinators,
        }
    }

    pub(crate) fn transaction_manager(&self, index: u32) -> &TransactionManagerClient {
        self.transaction_managers.client(index)
    }

    pub(crate) async fn run_slot(&self) {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });

        let lease_manager_runs = self
            .lease_manager_drivers
            .iter()
            .map(|driver| driver.prepare_slot(token.clone()));
        futures::future::join_all(lease_manager_runs).await;

        let coordinator_runs = self
            .coordinators
            .iter()
            .map(|coordinator| coordinator.prepare_slot(token.clone()));
        futures::future::join_all(coordinator_runs).await;
    }

    pub(crate) fn submit(
        &self,
        index: u32,
        reads: &[&str],
        writes: &[(&str, i64)],
    ) -> JoinHandle<Result<TxSubmitOutput, TransactionManagerError>> {
        let client = self.transaction_manager(index).clone();
        let input = TxSubmitInput {
            client_id: "test-client".into(),
            reads: reads.iter().map(|key| key.to_string()).collect(),
            writes: writes.iter().map(|(key, value)| KeyValue::new(*key, *value)).collect(),
        };

        tokio::spawn(async move { client.tx_submit(input).await })
    }

    /// Wait until every lease manager has `count` requests buffered.
    pub(crate) async fn wait_for_lease_requests(&self, count: usize) {
        let poll = async {
            for index in 0..self.lease_managers.len() as u32 {
                loop {
                    let status = self.lease_managers.client(index).status().await.expect("actor alive");
                    if status.buffered_requests >= count {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        };

        tokio::time::timeout(Duration::from_secs(5), poll)
            .await
            .expect("Timed out waiting for lease requests");
    }

    pub(crate) async fn wait_for_value(&self, index: u32, key: &str, value: i64) {
        let client = self.transaction_manager(index);
        let poll = async {
            loop {
                let status = client.snapshot().await.expect("actor alive");
                if status.values.get(key) == Some(&value) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(Duration::from_secs(5), poll)
            .await
            .unwrap_or_else(|_| panic!("TM{} never saw {}={}", index, key, value));
    }
}
