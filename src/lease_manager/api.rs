use crate::cluster::{ParticipantIndex, Slot};
use crate::lease::{DecidedSlot, Lease};
use crate::lease_manager::Ballot;

#[derive(Debug)]
pub(crate) struct PrepareSlotOutput {
    pub(crate) slot: Slot,
    pub(crate) crashed: bool,
    // Only set on the slot's leader, when it has requests buffered.
    pub(crate) proposal: Option<Proposal>,
}

#[derive(Debug, Clone)]
pub(crate) struct Proposal {
    pub(crate) slot: Slot,
    pub(crate) ballot: Ballot,
    pub(crate) value: Vec<Lease>,
    pub(crate) acceptors: Vec<ParticipantIndex>,
}

#[derive(Debug, Clone)]
pub(crate) struct PrepareInput {
    pub(crate) slot: Slot,
    pub(crate) ballot: Ballot,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PromiseOutput {
    pub(crate) read_timestamp: Ballot,
    pub(crate) write_timestamp: Ballot,
    pub(crate) written_values: Vec<Lease>,
}

#[derive(Debug, Clone)]
pub(crate) struct AcceptInput {
    pub(crate) slot: Slot,
    pub(crate) ballot: Ballot,
    pub(crate) leases: Vec<Lease>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AcceptOutput {
    pub(crate) accepted: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct DecideInput {
    pub(crate) slot: Slot,
    pub(crate) acceptor: ParticipantIndex,
    pub(crate) write_timestamp: Ballot,
    pub(crate) leases: Vec<Lease>,
}

#[derive(Debug)]
pub(crate) struct DecideOutput {
    // Nothing
}

#[derive(Debug, Clone)]
pub(crate) struct LeaseRequestInput {
    pub(crate) slot: Slot,
    pub(crate) lease: Lease,
}

#[derive(Debug)]
pub(crate) struct LeaseRequestOutput {
    // Nothing
}

#[derive(Debug, Clone)]
pub(crate) struct StatusUpdateOutput {
    /// Every decided instance, oldest slot first.
    pub(crate) decided: Vec<DecidedSlot>,
}

/// Point-in-time view of a lease manager.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseManagerStatus {
    pub slot: Slot,
    pub crashed: bool,
    pub decided_slots: usize,
    pub buffered_requests: usize,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum LeaseManagerError {
    #[error("acceptor {0:?} is not a lease manager")]
    UnknownAcceptor(ParticipantIndex),
    #[error("lease manager actor has exited")]
    ActorExited,
}
