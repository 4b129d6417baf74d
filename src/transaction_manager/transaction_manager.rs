use crate::actor::Callback;
use crate::cluster::{ParticipantId, ParticipantIndex, Roster, Slot, SlotSchedule};
use crate::lease::Lease;
use crate::lease_manager::LeaseRequestInput;
use crate::transaction_manager::conflict::LeaseTable;
use crate::transaction_manager::store::KeyValueStore;
use crate::transaction_manager::{
    AdoptLogOutput, ApplyStatusInput, ApplyStatusOutput, BeginSlotOutput, CommitPlan, Contention, KeyValue,
    LeaseManagers, SameSlotLeaseExecutionInput, SameSlotLeaseExecutionOutput, SuspicionInput, SuspicionOutput,
    TransactionManagerError, TransactionManagerPhase, TransactionManagerStatus, TxCommitInput, TxCommitOutput, TxId,
    TxPrepareInput, TxPrepareOutput, TxSubmitInput, TxSubmitOutput, UpdateOutput,
};
use std::collections::HashSet;
use std::sync::Arc;

pub(crate) struct TransactionManagerConfig<L: LeaseManagers> {
    pub(crate) logger: slog::Logger,
    pub(crate) my_index: ParticipantIndex,
    pub(crate) roster: Roster,
    pub(crate) lease_manager_roster: Roster,
    pub(crate) schedule: Arc<SlotSchedule>,
    pub(crate) lease_managers: Arc<L>,
}

/// A client transaction waiting for its leases.
struct TransactionState {
    id: TxId,
    request: TxSubmitInput,
    // Every key read or written, and whether a lease we hold covers it.
    permissions: Vec<(String, bool)>,
    requested_in: Slot,
    reply: Callback<TxSubmitOutput, TransactionManagerError>,
}

impl TransactionState {
    fn uncovered_keys(&self) -> Vec<String> {
        self.permissions
            .iter()
            .filter(|(_, granted)| !granted)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

type ReleaseWaiter = (
    SameSlotLeaseExecutionInput,
    Callback<SameSlotLeaseExecutionOutput, TransactionManagerError>,
);

/// TransactionManager is the single-owner state of one transaction manager process: committed
/// data, held leases, and client transactions waiting for leases.
///
/// The slot driver walks it through each slot's phases. Inbound peer requests are answered
/// directly, except a same-slot release request which is parked until our side has let go.
pub(crate) struct TransactionManager<L: LeaseManagers> {
    logger: slog::Logger,
    my_id: ParticipantId,
    roster: Roster,
    lease_manager_roster: Roster,
    schedule: Arc<SlotSchedule>,
    lease_managers: Arc<L>,
    current_slot: Slot,
    crashed: bool,
    phase: TransactionManagerPhase,
    store: KeyValueStore,
    leases: LeaseTable,
    pending: Vec<TransactionState>,
    next_tx_number: u64,
    // Transactions other coordinators prepared with us that haven't committed.
    prepared: HashSet<TxId>,
    release_waiters: Vec<ReleaseWaiter>,
}

impl<L: LeaseManagers> TransactionManager<L> {
    pub(crate) fn new(config: TransactionManagerConfig<L>) -> Result<Self, TransactionManagerError> {
        let my_id = config
            .roster
            .id(config.my_index)
            .cloned()
            .ok_or(TransactionManagerError::NotInRoster(config.my_index))?;

        Ok(TransactionManager {
            logger: config.logger,
            leases: LeaseTable::new(my_id.clone()),
            my_id,
            roster: config.roster,
            lease_manager_roster: config.lease_manager_roster,
            schedule: config.schedule,
            lease_managers: config.lease_managers,
            current_slot: Slot::default(),
            crashed: false,
            phase: TransactionManagerPhase::Idle,
            store: KeyValueStore::default(),
            pending: Vec::new(),
            next_tx_number: 0,
            prepared: HashSet::new(),
            release_waiters: Vec::new(),
        })
    }

    pub(crate) fn is_crashed(&self) -> bool {
        self.crashed
    }

    // ------- Slot driver --------

    pub(crate) fn begin_slot(&mut self) -> BeginSlotOutput {
        self.current_slot = self.current_slot.next();
        let slot = self.current_slot;

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

        self.phase = if self.crashed {
            TransactionManagerPhase::Crashed
        } else {
            TransactionManagerPhase::ReconcilingLog
        };

        BeginSlotOutput {
            slot,
            crashed: self.crashed,
            reachable_transaction_managers: self.schedule.reachable(slot, &self.my_id, &self.roster),
            reachable_lease_managers: self.schedule.reachable(slot, &self.my_id, &self.lease_manager_roster),
            suspects: self.schedule.state(slot, &self.my_id).suspects,
        }
    }

    pub(crate) fn enter_phase(&mut self, phase: TransactionManagerPhase) {
        self.phase = phase;
    }

    /// Replace our data with the majority's log when we're behind it. Whatever we held or were
    /// working on was decided against stale data, so it goes too.
    pub(crate) fn adopt_log(&mut self, log: Vec<KeyValue>) -> AdoptLogOutput {
        if log.len() <= self.store.log().len() {
            return AdoptLogOutput { adopted: false };
        }

        slog::info!(
            self.logger,
            "Slot {:?}: adopting majority log ({} entries, had {}). Discarding {} pending transactions",
            self.current_slot,
            log.len(),
            self.store.log().len(),
            self.pending.len()
        );

        self.store.reset_to(log);
        self.leases.clear();
        self.prepared.clear();
        for tx in self.pending.drain(..) {
            tx.reply.send(Err(TransactionManagerError::Discarded));
        }
        self.answer_release_waiters();

        AdoptLogOutput { adopted: true }
    }

    pub(crate) fn apply_status(&mut self, input: ApplyStatusInput) -> ApplyStatusOutput {
        self.phase = TransactionManagerPhase::ResolvingConflicts;

        let outcome = self.leases.fold(&input.decided);
        if !outcome.acquired.is_empty() || !outcome.revoked.is_empty() || !outcome.contested.is_empty() {
            slog::info!(
                self.logger,
                "Slot {:?}: acquired {:?}, revoked {:?}, contested {:?}",
                self.current_slot,
                outcome.acquired,
                outcome.revoked,
                outcome.contested
            );
        }

        self.refresh_permissions();

        let mut contentions: Vec<Contention> = Vec::new();
        let mut unknown_winners = Vec::new();
        for tx in self.pending.iter() {
            for (key, _) in tx.permissions.iter() {
                let (slot, lease, winner) = match self.leases.contention(key) {
                    Some(contention) => contention,
                    None => continue,
                };
                if contentions.iter().any(|c| c.slot == slot && c.lease == lease) {
                    continue;
                }

                match self.roster.index_of(&winner) {
                    Some(winner_index) => contentions.push(Contention {
                        slot,
                        lease,
                        winner,
                        winner_index,
                    }),
                    None => unknown_winners.push((slot, lease, winner)),
                }
            }
        }

        // Leases granted to someone outside our roster can't be waited on.
        for (slot, lease, winner) in unknown_winners {
            slog::warn!(self.logger, "Lease race lost to unknown participant {:?}", winner);
            self.leases.clear_contention(slot, &lease);
        }

        self.answer_release_waiters();

        ApplyStatusOutput { contentions }
    }

    pub(crate) fn clear_contention(&mut self, contention: Contention) {
        self.leases.clear_contention(contention.slot, &contention.lease);
    }

    /// Every pending transaction whose keys are all covered by leases we may act on, oldest
    /// first.
    pub(crate) fn commit_plans(&mut self) -> Vec<CommitPlan> {
        self.phase = TransactionManagerPhase::Committing;

        let leases = &self.leases;
        self.pending
            .iter()
            .filter(|tx| tx.permissions.iter().all(|(key, _)| leases.ready(key)))
            .map(|tx| CommitPlan {
                tx_id: tx.id.clone(),
                writes: tx.request.writes.clone(),
            })
            .collect()
    }

    /// A majority committed the transaction. Apply it here and answer the client.
    pub(crate) fn finish_commit(&mut self, tx_id: TxId) {
        let position = match self.pending.iter().position(|tx| tx.id == tx_id) {
            Some(position) => position,
            None => {
                slog::warn!(self.logger, "Finished commit of unknown transaction {:?}", tx_id);
                return;
            }
        };

        let tx = self.pending.remove(position);
        let values_read = tx
            .request
            .reads
            .iter()
            .filter_map(|key| self.store.read(key).map(|value| KeyValue::new(key.clone(), value)))
            .collect();
        self.store.apply(&tx.request.writes);

        slog::info!(
            self.logger,
            "Slot {:?}: committed {:?} for client {}",
            self.current_slot,
            tx.id,
            tx.request.client_id
        );
        tx.reply.send(Ok(TxSubmitOutput { values_read }));

        self.answer_release_waiters();
    }

    pub(crate) fn end_slot(&mut self) {
        let released = self.leases.release_contested();
        if !released.is_empty() {
            slog::info!(
                self.logger,
                "Slot {:?}: released same-slot leases {:?}",
                self.current_slot,
                released
            );
        }

        self.refresh_permissions();

        let slot = self.current_slot;
        let mut requests = Vec::new();
        for tx in self.pending.iter_mut() {
            if tx.requested_in >= slot {
                continue;
            }
            let keys = tx.uncovered_keys();
            if !keys.is_empty() {
                tx.requested_in = slot;
                requests.push(keys);
            }
        }
        for keys in requests {
            self.request_lease(keys);
        }

        self.phase = TransactionManagerPhase::Idle;
        self.answer_release_waiters();
    }

    // ------- Client facing --------

    pub(crate) fn handle_tx_submit(
        &mut self,
        input: TxSubmitInput,
        callback: Callback<TxSubmitOutput, TransactionManagerError>,
    ) {
        self.next_tx_number += 1;
        let id = TxId::new(format!("{}-{}", self.my_id, self.next_tx_number));

        let mut keys: Vec<String> = Vec::new();
        let requested = input.reads.iter().chain(input.writes.iter().map(|w| &w.key));
        for key in requested {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }

        let permissions: Vec<(String, bool)> = keys
            .into_iter()
            .map(|key| {
                let granted = self.leases.covers(&key);
                (key, granted)
            })
            .collect();

        let tx = TransactionState {
            id,
            request: input,
            permissions,
            requested_in: self.current_slot,
            reply: callback,
        };

        let missing = tx.uncovered_keys();
        slog::info!(
            self.logger,
            "Slot {:?}: queued {:?} from client {}, requesting {:?}",
            self.current_slot,
            tx.id,
            tx.request.client_id,
            missing
        );
        if !missing.is_empty() {
            self.request_lease(missing);
        }

        self.pending.push(tx);
    }

    pub(crate) fn status(&self) -> TransactionManagerStatus {
        TransactionManagerStatus {
            slot: self.current_slot,
            phase: self.phase,
            held_keys: self.leases.held_keys(),
            pending_transactions: self.pending.len(),
            write_log: self.store.log().to_vec(),
            values: self.store.snapshot(),
        }
    }

    // ------- Peer to peer --------

    pub(crate) fn handle_prepare(&mut self, input: TxPrepareInput) -> Result<TxPrepareOutput, TransactionManagerError> {
        slog::debug!(
            self.logger,
            "Preparing {:?} for {:?} (their slot {:?})",
            input.tx_id,
            input.coordinator,
            input.slot
        );
        self.prepared.insert(input.tx_id);

        Ok(TxPrepareOutput { vote: true })
    }

    pub(crate) fn handle_commit(&mut self, input: TxCommitInput) -> Result<TxCommitOutput, TransactionManagerError> {
        if !self.prepared.remove(&input.tx_id) {
            slog::debug!(self.logger, "Commit of {:?} without a prepare", input.tx_id);
        }

        slog::info!(
            self.logger,
            "Slot {:?}: applying {:?} from {:?}",
            self.current_slot,
            input.tx_id,
            input.coordinator
        );
        self.store.apply(&input.writes);

        Ok(TxCommitOutput {})
    }

    pub(crate) fn handle_update(&self) -> Result<UpdateOutput, TransactionManagerError> {
        Ok(UpdateOutput {
            write_log: self.store.log().to_vec(),
        })
    }

    pub(crate) fn handle_same_slot_lease_execution(
        &mut self,
        input: SameSlotLeaseExecutionInput,
        callback: Callback<SameSlotLeaseExecutionOutput, TransactionManagerError>,
    ) {
        self.release_waiters.retain(|(_, waiter)| !waiter.is_abandoned());
        self.release_waiters.push((input, callback));
        self.answer_release_waiters();
    }

    pub(crate) fn handle_suspicion(&self, input: SuspicionInput) -> Result<SuspicionOutput, TransactionManagerError> {
        Ok(SuspicionOutput {
            suspected: self.schedule.suspects(self.current_slot, &self.my_id, &input.suspect),
        })
    }

    // ------- Internal --------

    fn refresh_permissions(&mut self) {
        for tx in self.pending.iter_mut() {
            for (key, granted) in tx.permissions.iter_mut() {
                *granted = self.leases.covers(key);
            }
        }
    }

    fn request_lease(&self, keys: Vec<String>) {
        let input = LeaseRequestInput {
            slot: self.current_slot,
            lease: Lease::new(self.my_id.clone(), keys),
        };

        for lease_manager in self.lease_manager_roster.indices() {
            let logger = self.logger.clone();
            let lease_managers = self.lease_managers.clone();
            let input = input.clone();
            tokio::spawn(async move {
                if let Err(e) = lease_managers.lease_request(lease_manager, input).await {
                    slog::warn!(logger, "Lease request to {:?} failed: {}", lease_manager, e);
                }
            });
        }
    }

    /// Answer every same-slot release request our side has settled.
    fn answer_release_waiters(&mut self) {
        if self.release_waiters.is_empty() {
            return;
        }

        let waiters = std::mem::take(&mut self.release_waiters);
        for (input, callback) in waiters {
            if self.leases.has_released(input.slot, &input.lease) {
                callback.send(Ok(SameSlotLeaseExecutionOutput {}));
            } else {
                self.release_waiters.push((input, callback));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{localhost_roster, ProcessState};
    use crate::lease::DecidedSlot;
    use crate::lease_manager::StatusUpdateOutput;
    use crate::quorum::PeerError;
    use crate::test_utils::test_logger;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Records lease requests instead of sending them.
    #[derive(Default)]
    struct RecordingLeaseManagers {
        requests: Mutex<Vec<(ParticipantIndex, Lease)>>,
    }

    #[async_trait::async_trait]
    impl LeaseManagers for RecordingLeaseManagers {
        async fn lease_request(&self, lease_manager: ParticipantIndex, input: LeaseRequestInput) -> Result<(), PeerError> {
            self.requests.lock().unwrap().push((lease_manager, input.lease));
            Ok(())
        }

        async fn status_update(&self, _: ParticipantIndex) -> Result<StatusUpdateOutput, PeerError> {
            Err(PeerError::Timeout)
        }
    }

    impl RecordingLeaseManagers {
        /// Distinct leases requested so far.
        async fn requested(&self) -> Vec<Lease> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let mut leases: Vec<Lease> = self.requests.lock().unwrap().iter().map(|(_, l)| l.clone()).collect();
            leases.dedup();
            leases
        }
    }

    fn transaction_manager(
        index: u32,
        schedule: SlotSchedule,
    ) -> (TransactionManager<RecordingLeaseManagers>, Arc<RecordingLeaseManagers>) {
        let lease_managers = Arc::new(RecordingLeaseManagers::default());
        let tm = TransactionManager::new(TransactionManagerConfig {
            logger: test_logger(),
            my_index: ParticipantIndex::new(index),
            roster: localhost_roster("TM", 3, 6000),
            lease_manager_roster: localhost_roster("LM", 1, 5000),
            schedule: Arc::new(schedule),
            lease_managers: lease_managers.clone(),
        })
        .unwrap();

        (tm, lease_managers)
    }

    fn normal() -> SlotSchedule {
        SlotSchedule::all_normal(Duration::from_millis(100))
    }

    fn submit(
        tm: &mut TransactionManager<RecordingLeaseManagers>,
        reads: &[&str],
        writes: &[(&str, i64)],
    ) -> oneshot::Receiver<Result<TxSubmitOutput, TransactionManagerError>> {
        let (callback, rx) = Callback::new();
        tm.handle_tx_submit(
            TxSubmitInput {
                client_id: "client".into(),
                reads: reads.iter().map(|k| k.to_string()).collect(),
                writes: writes.iter().map(|(k, v)| KeyValue::new(*k, *v)).collect(),
            },
            callback,
        );
        rx
    }

    fn decided(slot: u64, leases: Vec<Lease>) -> ApplyStatusInput {
        ApplyStatusInput {
            decided: vec![DecidedSlot {
                slot: Slot::new(slot),
                leases,
            }],
        }
    }

    #[tokio::test]
    async fn transaction_waits_for_leases_then_commits() {
        let (mut tm, lease_managers) = transaction_manager(0, normal());
        tm.begin_slot();
        tm.store.apply(&[KeyValue::new("a", 3)]);

        let mut reply = submit(&mut tm, &["a"], &[("b", 5)]);
        assert_eq!(lease_managers.requested().await, vec![Lease::new("TM0", vec!["a", "b"])]);
        assert!(tm.commit_plans().is_empty());
        assert!(reply.try_recv().is_err());

        tm.end_slot();
        tm.begin_slot();
        tm.apply_status(decided(2, vec![Lease::new("TM0", vec!["a", "b"])]));
        let plans = tm.commit_plans();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].writes, vec![KeyValue::new("b", 5)]);

        tm.finish_commit(plans[0].tx_id.clone());
        let output = reply.await.unwrap().unwrap();
        assert_eq!(output.values_read, vec![KeyValue::new("a", 3)]);
        assert_eq!(tm.store.read("b"), Some(5));
        assert_eq!(tm.status().pending_transactions, 0);
    }

    #[tokio::test]
    async fn missing_read_keys_are_left_out() {
        let (mut tm, _) = transaction_manager(0, normal());
        tm.begin_slot();
        let reply = submit(&mut tm, &["nope"], &[]);
        tm.apply_status(decided(1, vec![Lease::new("TM0", vec!["nope"])]));

        let plan = tm.commit_plans().pop().expect("ready to commit");
        tm.finish_commit(plan.tx_id);
        assert!(reply.await.unwrap().unwrap().values_read.is_empty());
    }

    #[tokio::test]
    async fn revoked_keys_are_requested_again_at_slot_end() {
        let (mut tm, lease_managers) = transaction_manager(0, normal());
        tm.begin_slot();
        tm.apply_status(decided(1, vec![Lease::new("TM0", vec!["x"])]));
        let _reply = submit(&mut tm, &["x"], &[]);
        assert!(lease_managers.requested().await.is_empty());

        tm.end_slot();
        tm.begin_slot();
        tm.apply_status(decided(2, vec![Lease::new("TM1", vec!["x"])]));
        assert!(tm.commit_plans().is_empty());
        tm.end_slot();

        assert_eq!(lease_managers.requested().await, vec![Lease::new("TM0", vec!["x"])]);
    }

    #[tokio::test]
    async fn losing_a_same_slot_race_reports_contention() {
        let (mut tm, _) = transaction_manager(1, normal());
        tm.begin_slot();
        let _reply = submit(&mut tm, &["x"], &[]);

        let output = tm.apply_status(decided(
            1,
            vec![Lease::new("TM0", vec!["x"]), Lease::new("TM1", vec!["x"])],
        ));
        assert_eq!(output.contentions.len(), 1);
        let contention = output.contentions[0].clone();
        assert_eq!(contention.winner, ParticipantId::new("TM0"));
        assert_eq!(contention.winner_index, ParticipantIndex::new(0));
        assert!(tm.commit_plans().is_empty());

        tm.clear_contention(contention);
        assert_eq!(tm.commit_plans().len(), 1);
    }

    #[tokio::test]
    async fn winner_answers_release_request_at_slot_end() {
        let (mut tm, _) = transaction_manager(0, normal());
        tm.begin_slot();
        let theirs = Lease::new("TM1", vec!["x"]);

        let (callback, mut rx) = Callback::new();
        tm.handle_same_slot_lease_execution(
            SameSlotLeaseExecutionInput {
                slot: Slot::new(1),
                lease: theirs.clone(),
            },
            callback,
        );
        // Haven't folded slot 1 yet.
        assert!(rx.try_recv().is_err());

        tm.apply_status(decided(1, vec![Lease::new("TM0", vec!["x"]), theirs]));
        assert!(rx.try_recv().is_err());
        assert!(tm.status().held_keys.contains("x"));

        tm.end_slot();
        assert!(rx.await.unwrap().is_ok());
        assert!(tm.status().held_keys.is_empty());
    }

    #[tokio::test]
    async fn adopting_a_longer_log_discards_pending_work() {
        let (mut tm, _) = transaction_manager(0, normal());
        tm.begin_slot();
        tm.apply_status(decided(1, vec![Lease::new("TM0", vec!["x"])]));
        let reply = submit(&mut tm, &["x"], &[("x", 1)]);

        assert!(!tm.adopt_log(Vec::new()).adopted);
        assert!(tm.adopt_log(vec![KeyValue::new("y", 2)]).adopted);

        assert!(matches!(reply.await.unwrap(), Err(TransactionManagerError::Discarded)));
        let status = tm.status();
        assert!(status.held_keys.is_empty());
        assert_eq!(status.values.get("y"), Some(&2));
        assert_eq!(status.pending_transactions, 0);
    }

    #[tokio::test]
    async fn participant_applies_commits() {
        let (mut tm, _) = transaction_manager(2, normal());
        tm.begin_slot();
        let tx_id = TxId::new("TM0-1");

        let vote = tm
            .handle_prepare(TxPrepareInput {
                coordinator: "TM0".into(),
                tx_id: tx_id.clone(),
                slot: Slot::new(1),
            })
            .unwrap();
        assert!(vote.vote);

        tm.handle_commit(TxCommitInput {
            coordinator: "TM0".into(),
            tx_id,
            writes: vec![KeyValue::new("k", 7)],
        })
        .unwrap();
        assert_eq!(tm.handle_update().unwrap().write_log, vec![KeyValue::new("k", 7)]);
        assert!(tm.prepared.is_empty());
    }

    #[test]
    fn suspicion_follows_schedule() {
        let mut schedule = normal();
        schedule.set_state(
            Slot::new(1),
            "TM1",
            ProcessState {
                crashed: false,
                suspects: vec![ParticipantId::new("TM0")].into_iter().collect(),
            },
        );
        let (mut tm, _) = transaction_manager(1, schedule);
        tm.begin_slot();

        let ask = |tm: &TransactionManager<_>, suspect: &str| {
            tm.handle_suspicion(SuspicionInput {
                suspect: suspect.into(),
            })
            .unwrap()
            .suspected
        };
        assert!(ask(&tm, "TM0"));
        assert!(!ask(&tm, "TM2"));
    }

    #[test]
    fn crashed_slot() {
        let mut schedule = normal();
        schedule.set_state(Slot::new(2), "TM0", ProcessState::crashed());
        let (mut tm, _) = transaction_manager(0, schedule);

        assert!(!tm.begin_slot().crashed);
        let output = tm.begin_slot();
        assert!(output.crashed);
        assert!(tm.is_crashed());
        assert_eq!(tm.status().phase, TransactionManagerPhase::Crashed);
        assert_eq!(output.reachable_transaction_managers.len(), 2);
    }
}
