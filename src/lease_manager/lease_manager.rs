use crate::actor::Callback;
use crate::cluster::{ParticipantId, ParticipantIndex, Roster, Slot, SlotSchedule};
use crate::lease::Lease;
use crate::lease_manager::ballot_store::BallotStore;
use crate::lease_manager::election::elect_leader;
use crate::lease_manager::{
    paxos, AcceptInput, AcceptOutput, Ballot, DecideInput, DecideOutput, LeaseManagerError, LeaseManagerStatus,
    LeaseRequestInput, LeaseRequestOutput, PaxosPeers, PrepareInput, PrepareSlotOutput, PromiseOutput, Proposal,
    StatusUpdateOutput,
};
use std::sync::Arc;

pub(crate) struct LeaseManagerConfig<P: PaxosPeers> {
    pub(crate) logger: slog::Logger,
    pub(crate) my_index: ParticipantIndex,
    pub(crate) roster: Roster,
    pub(crate) schedule: Arc<SlotSchedule>,
    pub(crate) peers: Arc<P>,
}

/// LeaseManager is the single-owner state of one lease manager process: the ballot of every slot,
/// the buffer of requests not yet decided, and whether the schedule has us crashed.
///
/// Nothing in here blocks. Slow work (proposing, broadcasting decisions) is spawned, and callers
/// that must wait are parked and re-checked whenever an instance settles.
pub(crate) struct LeaseManager<P: PaxosPeers> {
    logger: slog::Logger,
    my_id: ParticipantId,
    my_index: ParticipantIndex,
    roster: Roster,
    schedule: Arc<SlotSchedule>,
    peers: Arc<P>,
    current_slot: Slot,
    crashed: bool,
    ballots: BallotStore,
    // Drained on decision, never cleared.
    requests: Vec<Lease>,
    status_waiters: Vec<Callback<StatusUpdateOutput, LeaseManagerError>>,
}

impl<P: PaxosPeers> LeaseManager<P> {
    pub(crate) fn new(config: LeaseManagerConfig<P>) -> Result<Self, LeaseManagerError> {
        let my_id = config
            .roster
            .id(config.my_index)
            .cloned()
            .ok_or(LeaseManagerError::UnknownAcceptor(config.my_index))?;

        Ok(LeaseManager {
            logger: config.logger,
            my_id,
            my_index: config.my_index,
            roster: config.roster,
            schedule: config.schedule,
            peers: config.peers,
            current_slot: Slot::default(),
            crashed: false,
            ballots: BallotStore::default(),
            requests: Vec::new(),
            status_waiters: Vec::new(),
        })
    }

    pub(crate) fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub(crate) fn prepare_slot(&mut self) -> PrepareSlotOutput {
        let completed = self.current_slot;
        self.current_slot = completed.next();
        let slot = self.current_slot;

        // Whatever didn't decide in time has failed for good. Requests stay buffered.
        self.ballots.stop(completed);

        let was_crashed = self.crashed;
        self.crashed = self.schedule.is_crashed(slot, &self.my_id);
        if self.crashed != was_crashed {
            slog::info!(
                self.logger,
                "Slot {:?}: now {}",
                slot,
                if self.crashed { "crashed" } else { "normal" }
            );
        }

        if self.crashed {
            return PrepareSlotOutput {
                slot,
                crashed: true,
                proposal: None,
            };
        }

        let mut proposal = None;
        if !self.requests.is_empty() {
            self.ballots.instance_mut(slot).set_running(true);

            match elect_leader(&self.schedule, slot, &self.roster) {
                Some(leader) if leader == self.my_index => {
                    slog::info!(
                        self.logger,
                        "Slot {:?}: leading, proposing {} buffered requests",
                        slot,
                        self.requests.len()
                    );
                    proposal = Some(Proposal {
                        slot,
                        ballot: Ballot::new(slot, self.my_index),
                        value: self.requests.clone(),
                        acceptors: self.schedule.reachable(slot, &self.my_id, &self.roster),
                    });
                }
                Some(leader) => {
                    slog::debug!(self.logger, "Slot {:?}: leader is {:?}", slot, leader);
                }
                None => {
                    slog::warn!(self.logger, "Slot {:?}: no participant qualifies as leader", slot);
                }
            }
        }

        self.release_status_waiters();

        PrepareSlotOutput {
            slot,
            crashed: false,
            proposal,
        }
    }

    pub(crate) fn handle_prepare(&mut self, input: PrepareInput) -> Result<PromiseOutput, LeaseManagerError> {
        let promise = self.ballots.instance_mut(input.slot).promise(input.ballot);
        slog::debug!(
            self.logger,
            "Slot {:?}: promised {:?} for {:?}",
            input.slot,
            promise.read_timestamp,
            input.ballot
        );

        Ok(promise)
    }

    pub(crate) fn handle_accept(&mut self, input: AcceptInput) -> Result<AcceptOutput, LeaseManagerError> {
        let accepted = self
            .ballots
            .instance_mut(input.slot)
            .accept(input.ballot, input.leases.clone());

        if !accepted {
            slog::info!(
                self.logger,
                "Slot {:?}: rejected accept for {:?}, promised a newer ballot",
                input.slot,
                input.ballot
            );
            return Ok(AcceptOutput { accepted: false });
        }

        paxos::broadcast_decide(
            &self.logger,
            &self.peers,
            self.roster.indices(),
            DecideInput {
                slot: input.slot,
                acceptor: self.my_index,
                write_timestamp: input.ballot,
                leases: input.leases,
            },
        );

        Ok(AcceptOutput { accepted: true })
    }

    pub(crate) fn handle_decide(&mut self, input: DecideInput) -> Result<DecideOutput, LeaseManagerError> {
        if self.roster.member(input.acceptor).is_none() {
            return Err(LeaseManagerError::UnknownAcceptor(input.acceptor));
        }

        let majority = self.roster.majority();
        let decided = self.ballots.instance_mut(input.slot).learn(
            input.acceptor,
            input.write_timestamp,
            input.leases,
            majority,
        );

        if decided {
            let leases = self
                .ballots
                .instance(input.slot)
                .and_then(|instance| instance.decided_values())
                .cloned()
                .unwrap_or_default();
            slog::info!(self.logger, "Slot {:?}: decided {:?}", input.slot, leases);

            self.requests.retain(|request| !leases.contains(request));
            self.release_status_waiters();
        }

        Ok(DecideOutput {})
    }

    pub(crate) fn handle_lease_request(
        &mut self,
        input: LeaseRequestInput,
    ) -> Result<LeaseRequestOutput, LeaseManagerError> {
        slog::debug!(
            self.logger,
            "Lease request from {:?} (their slot {:?}): {:?}",
            input.lease.owner,
            input.slot,
            input.lease.permissions
        );

        if !self.requests.contains(&input.lease) {
            self.requests.push(input.lease);
        }

        Ok(LeaseRequestOutput {})
    }

    pub(crate) fn handle_status_update(&mut self, callback: Callback<StatusUpdateOutput, LeaseManagerError>) {
        self.status_waiters.retain(|waiter| !waiter.is_abandoned());
        self.status_waiters.push(callback);
        self.release_status_waiters();
    }

    pub(crate) fn status(&self) -> LeaseManagerStatus {
        LeaseManagerStatus {
            slot: self.current_slot,
            crashed: self.crashed,
            decided_slots: self.ballots.decided_count(),
            buffered_requests: self.requests.len(),
        }
    }

    /// Status waiters are answered once the current slot's instance is settled: decided, stopped,
    /// or never started.
    fn release_status_waiters(&mut self) {
        let running = self
            .ballots
            .instance(self.current_slot)
            .map(|instance| instance.is_running())
            .unwrap_or(false);
        if running || self.status_waiters.is_empty() {
            return;
        }

        let decided = self.ballots.decided_history();
        for waiter in self.status_waiters.drain(..) {
            waiter.send(Ok(StatusUpdateOutput {
                decided: decided.clone(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{localhost_roster, ProcessState};
    use crate::quorum::PeerError;
    use crate::test_utils::test_logger;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records outbound decides instead of sending them.
    #[derive(Default)]
    struct RecordingPeers {
        decides: Mutex<Vec<(ParticipantIndex, DecideInput)>>,
    }

    #[async_trait::async_trait]
    impl PaxosPeers for RecordingPeers {
        async fn prepare(&self, _: ParticipantIndex, _: PrepareInput) -> Result<PromiseOutput, PeerError> {
            Err(PeerError::Timeout)
        }

        async fn accept(&self, _: ParticipantIndex, _: AcceptInput) -> Result<AcceptOutput, PeerError> {
            Err(PeerError::Timeout)
        }

        async fn decide(&self, learner: ParticipantIndex, input: DecideInput) -> Result<(), PeerError> {
            self.decides.lock().unwrap().push((learner, input));
            Ok(())
        }
    }

    fn lease_manager(index: u32, schedule: SlotSchedule) -> (LeaseManager<RecordingPeers>, Arc<RecordingPeers>) {
        let peers = Arc::new(RecordingPeers::default());
        let lm = LeaseManager::new(LeaseManagerConfig {
            logger: test_logger(),
            my_index: ParticipantIndex::new(index),
            roster: localhost_roster("LM", 3, 5000),
            schedule: Arc::new(schedule),
            peers: peers.clone(),
        })
        .unwrap();

        (lm, peers)
    }

    fn request(owner: &str, key: &str) -> LeaseRequestInput {
        LeaseRequestInput {
            slot: Slot::new(1),
            lease: Lease::new(owner, vec![key]),
        }
    }

    fn decide(lm: &mut LeaseManager<RecordingPeers>, slot: u64, acceptor: u32, leases: Vec<Lease>) {
        lm.handle_decide(DecideInput {
            slot: Slot::new(slot),
            acceptor: ParticipantIndex::new(acceptor),
            write_timestamp: Ballot::new(Slot::new(slot), ParticipantIndex::new(0)),
            leases,
        })
        .unwrap();
    }

    #[test]
    fn leader_proposes_buffered_requests() {
        let (mut lm, _) = lease_manager(0, SlotSchedule::all_normal(Duration::from_millis(100)));

        // Nothing buffered, nothing to propose.
        assert!(lm.prepare_slot().proposal.is_none());

        lm.handle_lease_request(request("TM1", "x")).unwrap();
        lm.handle_lease_request(request("TM1", "x")).unwrap();
        lm.handle_lease_request(request("TM2", "x")).unwrap();

        let output = lm.prepare_slot();
        assert_eq!(output.slot, Slot::new(2));
        let proposal = output.proposal.expect("leader proposes");
        assert_eq!(proposal.ballot, Ballot::new(Slot::new(2), ParticipantIndex::new(0)));
        // Identical requests are buffered once, different owners never merge.
        assert_eq!(proposal.value, vec![Lease::new("TM1", vec!["x"]), Lease::new("TM2", vec!["x"])]);
        assert_eq!(proposal.acceptors.len(), 3);
    }

    #[test]
    fn followers_do_not_propose() {
        let (mut lm, _) = lease_manager(1, SlotSchedule::all_normal(Duration::from_millis(100)));
        lm.handle_lease_request(request("TM1", "x")).unwrap();

        assert!(lm.prepare_slot().proposal.is_none());
    }

    #[test]
    fn crashed_lease_manager_skips_its_slot() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_millis(100));
        schedule.set_state(Slot::new(1), "LM0", ProcessState::crashed());
        schedule.set_state(Slot::new(2), "LM0", ProcessState::normal());
        let (mut lm, _) = lease_manager(0, schedule);
        lm.handle_lease_request(request("TM1", "x")).unwrap();

        let output = lm.prepare_slot();
        assert!(output.crashed);
        assert!(output.proposal.is_none());
        assert!(lm.is_crashed());

        let output = lm.prepare_slot();
        assert!(!output.crashed);
        assert!(output.proposal.is_some());
    }

    #[tokio::test]
    async fn accept_broadcasts_decide_to_every_learner() {
        let (mut lm, peers) = lease_manager(2, SlotSchedule::all_normal(Duration::from_millis(100)));
        let ballot = Ballot::new(Slot::new(1), ParticipantIndex::new(0));
        let leases = vec![Lease::new("TM1", vec!["x"])];

        lm.handle_prepare(PrepareInput {
            slot: Slot::new(1),
            ballot,
        })
        .unwrap();
        let output = lm
            .handle_accept(AcceptInput {
                slot: Slot::new(1),
                ballot,
                leases: leases.clone(),
            })
            .unwrap();
        assert!(output.accepted);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let decides = peers.decides.lock().unwrap();
        let mut learners: Vec<u32> = decides.iter().map(|(learner, _)| learner.as_u32()).collect();
        learners.sort_unstable();
        assert_eq!(learners, vec![0, 1, 2]);
        assert!(decides
            .iter()
            .all(|(_, d)| d.acceptor == ParticipantIndex::new(2) && d.leases == leases && d.write_timestamp == ballot));
    }

    #[test]
    fn decision_drains_exactly_the_decided_requests() {
        let (mut lm, _) = lease_manager(1, SlotSchedule::all_normal(Duration::from_millis(100)));
        lm.handle_lease_request(request("TM1", "x")).unwrap();
        lm.prepare_slot();
        lm.handle_lease_request(request("TM2", "y")).unwrap();

        let decided = vec![Lease::new("TM1", vec!["x"])];
        decide(&mut lm, 1, 0, decided.clone());
        assert_eq!(lm.status().buffered_requests, 2);
        decide(&mut lm, 1, 1, decided);

        let status = lm.status();
        assert_eq!(status.decided_slots, 1);
        assert_eq!(status.buffered_requests, 1);
    }

    #[test]
    fn status_update_waits_for_running_instance() {
        let (mut lm, _) = lease_manager(1, SlotSchedule::all_normal(Duration::from_millis(100)));
        lm.handle_lease_request(request("TM1", "x")).unwrap();
        lm.prepare_slot();

        let (callback, mut rx) = Callback::new();
        lm.handle_status_update(callback);
        assert!(rx.try_recv().is_err());

        let decided = vec![Lease::new("TM1", vec!["x"])];
        decide(&mut lm, 1, 0, decided.clone());
        assert!(rx.try_recv().is_err());
        decide(&mut lm, 1, 2, decided.clone());

        let output = rx.try_recv().expect("released").expect("status");
        assert_eq!(output.decided.len(), 1);
        assert_eq!(output.decided[0].slot, Slot::new(1));
        assert_eq!(output.decided[0].leases, decided);
    }

    #[test]
    fn status_update_released_when_slot_ends_undecided() {
        let (mut lm, _) = lease_manager(1, SlotSchedule::all_normal(Duration::from_millis(100)));
        lm.handle_lease_request(request("TM1", "x")).unwrap();
        lm.prepare_slot();

        let (callback, mut rx) = Callback::new();
        lm.handle_status_update(callback);
        assert!(rx.try_recv().is_err());

        // Slot 1 is stopped, but the requests carry over and slot 2's instance is running now.
        lm.prepare_slot();
        assert!(rx.try_recv().is_err());

        // Requests drained by a late decision of slot 1 leave slot 3 with nothing to run.
        decide(&mut lm, 1, 0, vec![Lease::new("TM1", vec!["x"])]);
        decide(&mut lm, 1, 1, vec![Lease::new("TM1", vec!["x"])]);
        let output = lm.prepare_slot();
        assert!(output.proposal.is_none());
        let output = rx.try_recv().expect("released").expect("status");
        assert_eq!(output.decided.len(), 1);
    }

    #[test]
    fn decide_from_stranger_is_rejected() {
        let (mut lm, _) = lease_manager(0, SlotSchedule::all_normal(Duration::from_millis(100)));
        let result = lm.handle_decide(DecideInput {
            slot: Slot::new(1),
            acceptor: ParticipantIndex::new(7),
            write_timestamp: Ballot::new(Slot::new(1), ParticipantIndex::new(0)),
            leases: vec![],
        });
        assert!(matches!(result, Err(LeaseManagerError::UnknownAcceptor(_))));
    }
}
