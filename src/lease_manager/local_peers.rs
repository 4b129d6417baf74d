use crate::cluster::{localhost_roster, ParticipantIndex, Slot, SlotSchedule};
use crate::lease::Lease;
use crate::lease_manager::{
    AcceptInput, AcceptOutput, DecideInput, LeaseManager, LeaseManagerActor, LeaseManagerClient, LeaseManagerConfig,
    PaxosPeers, PrepareInput, PromiseOutput,
};
use crate::quorum::PeerError;
use crate::test_utils::test_logger;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Routes Paxos calls straight to in-process actors. Calls to a disconnected member fail the way
/// an unreachable gRPC peer would.
pub(crate) struct LocalPaxosPeers {
    members: Vec<LeaseManagerClient>,
    disconnected: RwLock<HashSet<ParticipantIndex>>,
}

impl LocalPaxosPeers {
    pub(crate) fn member(&self, index: ParticipantIndex) -> Result<&LeaseManagerClient, PeerError> {
        if self.disconnected.read().unwrap().contains(&index) {
            return Err(PeerError::Connect(format!("{:?} is disconnected", index)));
        }

        self.members
            .get(index.as_usize())
            .ok_or(PeerError::UnknownParticipant(index))
    }
}

#[async_trait::async_trait]
impl PaxosPeers for LocalPaxosPeers {
    async fn prepare(&self, acceptor: ParticipantIndex, input: PrepareInput) -> Result<PromiseOutput, PeerError> {
        self.member(acceptor)?
            .prepare(input)
            .await
            .map_err(|e| PeerError::ServerFault(e.to_string()))
    }

    async fn accept(&self, acceptor: ParticipantIndex, input: AcceptInput) -> Result<AcceptOutput, PeerError> {
        self.member(acceptor)?
            .accept(input)
            .await
            .map_err(|e| PeerError::ServerFault(e.to_string()))
    }

    async fn decide(&self, learner: ParticipantIndex, input: DecideInput) -> Result<(), PeerError> {
        self.member(learner)?
            .decide(input)
            .await
            .map(|_| ())
            .map_err(|e| PeerError::ServerFault(e.to_string()))
    }
}

/// A lease manager cluster of in-process actors named LM0, LM1, ...
pub(crate) struct LocalLeaseManagerCluster {
    peers: Arc<LocalPaxosPeers>,
}

impl LocalLeaseManagerCluster {
    pub(crate) fn spawn(num_members: usize, schedule: SlotSchedule) -> Self {
        let roster = localhost_roster("LM", num_members, 5000);
        let schedule = Arc::new(schedule);

        let mut clients = Vec::with_capacity(num_members);
        let mut receivers = Vec::with_capacity(num_members);
        for _ in 0..num_members {
            let (client, rx) = LeaseManagerClient::new(64);
            clients.push(client);
            receivers.push(rx);
        }

        let peers = Arc::new(LocalPaxosPeers {
            members: clients,
            disconnected: RwLock::new(HashSet::new()),
        });

        for (index, rx) in receivers.into_iter().enumerate() {
            let logger = test_logger();
            let lease_manager = LeaseManager::new(LeaseManagerConfig {
                logger: logger.clone(),
                my_index: ParticipantIndex::new(index as u32),
                roster: roster.clone(),
                schedule: schedule.clone(),
                peers: peers.clone(),
            })
            .expect("index is in roster");

            tokio::spawn(LeaseManagerActor::new(logger, rx, lease_manager).run_event_loop());
        }

        LocalLeaseManagerCluster { peers }
    }

    pub(crate) fn peers(&self) -> &Arc<LocalPaxosPeers> {
        &self.peers
    }

    pub(crate) fn client(&self, index: u32) -> &LeaseManagerClient {
        &self.peers.members[index as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.peers.members.len()
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

    pub(crate) async fn prepare_all(&self) {
        for member in self.peers.members.iter() {
            member.prepare_slot().await.expect("actor alive");
        }
    }

    /// Poll a member until it learned `slot`'s value.
    pub(crate) async fn wait_decided(&self, index: u32, slot: Slot) -> Vec<Lease> {
        let client = self.client(index);
        let poll = async {
            loop {
                let status = client.status_update().await.expect("actor alive");
                if let Some(decided) = status.decided.into_iter().find(|d| d.slot == slot) {
                    return decided.leases;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(Duration::from_secs(5), poll)
            .await
            .expect("Timed out waiting for decision")
    }
}
