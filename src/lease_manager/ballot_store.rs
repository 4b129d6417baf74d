use crate::cluster::{ParticipantIndex, Slot};
use crate::lease::{DecidedSlot, Lease};
use crate::lease_manager::PromiseOutput;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Paxos proposal number. Ordered by round first, then by proposer, so ballots are unique and
/// grow with the slot. (0, #0) is "no ballot".
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct Ballot {
    round: Slot,
    proposer: ParticipantIndex,
}

impl Ballot {
    pub(crate) fn new(round: Slot, proposer: ParticipantIndex) -> Self {
        Ballot { round, proposer }
    }

    pub(crate) fn none() -> Self {
        Ballot::default()
    }

    pub(crate) fn is_none(&self) -> bool {
        *self == Ballot::none()
    }

    pub(crate) fn round(&self) -> Slot {
        self.round
    }

    pub(crate) fn proposer(&self) -> ParticipantIndex {
        self.proposer
    }
}

impl fmt::Debug for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.round, self.proposer)
    }
}

/// Consensus state of one (lease manager, slot) instance.
#[derive(Debug, Default)]
pub(crate) struct BallotState {
    read_timestamp: Ballot,
    write_timestamp: Ballot,
    written_values: Vec<Lease>,
    decided_values: Option<Vec<Lease>>,
    is_running: bool,
    // Latest Decide from each acceptor.
    decided_received: HashMap<ParticipantIndex, (Ballot, Vec<Lease>)>,
}

impl BallotState {
    pub(crate) fn promise(&mut self, ballot: Ballot) -> PromiseOutput {
        if ballot > self.read_timestamp {
            self.read_timestamp = ballot;
        }

        PromiseOutput {
            read_timestamp: self.read_timestamp,
            write_timestamp: self.write_timestamp,
            written_values: self.written_values.clone(),
        }
    }

    /// Accept iff nobody was promised a higher ballot since `ballot`'s promise.
    pub(crate) fn accept(&mut self, ballot: Ballot, leases: Vec<Lease>) -> bool {
        if ballot.is_none() || ballot != self.read_timestamp {
            return false;
        }

        self.write_timestamp = ballot;
        self.written_values = leases;
        true
    }

    /// Returns true only on the call that decides the instance.
    pub(crate) fn learn(
        &mut self,
        acceptor: ParticipantIndex,
        write_timestamp: Ballot,
        leases: Vec<Lease>,
        majority: usize,
    ) -> bool {
        if self.decided_values.is_some() || write_timestamp.is_none() {
            return false;
        }

        self.decided_received.insert(acceptor, (write_timestamp, leases));

        let (ballot, leases) = match self.decided_received.get(&acceptor) {
            Some(latest) => latest,
            None => return false,
        };
        let matching = self
            .decided_received
            .values()
            .filter(|(b, l)| b == ballot && l == leases)
            .count();

        if matching >= majority {
            self.decided_values = Some(leases.clone());
            self.is_running = false;
            return true;
        }

        false
    }

    pub(crate) fn decided_values(&self) -> Option<&Vec<Lease>> {
        self.decided_values.as_ref()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.is_running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }
}

#[derive(Debug, Default)]
pub(crate) struct BallotStore {
    instances: BTreeMap<Slot, BallotState>,
}

impl BallotStore {
    pub(crate) fn instance_mut(&mut self, slot: Slot) -> &mut BallotState {
        self.instances.entry(slot).or_default()
    }

    pub(crate) fn instance(&self, slot: Slot) -> Option<&BallotState> {
        self.instances.get(&slot)
    }

    pub(crate) fn stop(&mut self, slot: Slot) {
        if let Some(instance) = self.instances.get_mut(&slot) {
            instance.set_running(false);
        }
    }

    pub(crate) fn decided_history(&self) -> Vec<DecidedSlot> {
        self.instances
            .iter()
            .filter_map(|(slot, instance)| {
                instance.decided_values().map(|leases| DecidedSlot {
                    slot: *slot,
                    leases: leases.clone(),
                })
            })
            .collect()
    }

    pub(crate) fn decided_count(&self) -> usize {
        self.instances.values().filter(|i| i.decided_values().is_some()).count()
    }
}
