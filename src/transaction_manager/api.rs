use crate::cluster::{ParticipantId, ParticipantIndex, Slot};
use crate::grpc::ProtoKeyValue;
use crate::lease::{DecidedSlot, Lease};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single write, and the unit of the replicated write log.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyValue {
    pub key: String,
    pub value: i64,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        KeyValue { key: key.into(), value }
    }
}

impl From<ProtoKeyValue> for KeyValue {
    fn from(proto: ProtoKeyValue) -> Self {
        KeyValue::new(proto.key, proto.value)
    }
}

impl From<KeyValue> for ProtoKeyValue {
    fn from(kv: KeyValue) -> Self {
        ProtoKeyValue {
            key: kv.key,
            value: kv.value,
        }
    }
}

/// Names a transaction across the 2PC exchange. Minted by the coordinating transaction manager.
#[derive(Clone, Eq, PartialEq, Hash)]
pub(crate) struct TxId(String);

impl TxId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        TxId(id.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a transaction manager is within its slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransactionManagerPhase {
    Crashed,
    ReconcilingLog,
    PollingLeases,
    ResolvingConflicts,
    Committing,
    /// Done for this slot, waiting for the next tick.
    Idle,
}

/// Point-in-time view of a transaction manager.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionManagerStatus {
    pub slot: Slot,
    pub phase: TransactionManagerPhase,
    pub held_keys: BTreeSet<String>,
    pub pending_transactions: usize,
    pub write_log: Vec<KeyValue>,
    pub values: BTreeMap<String, i64>,
}

// ------- Client facing --------

#[derive(Clone, Debug)]
pub(crate) struct TxSubmitInput {
    pub(crate) client_id: String,
    pub(crate) reads: Vec<String>,
    pub(crate) writes: Vec<KeyValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TxSubmitOutput {
    /// Values as of just before the transaction's writes. Keys never written are left out.
    pub(crate) values_read: Vec<KeyValue>,
}

// ------- Slot driver --------

#[derive(Debug)]
pub(crate) struct BeginSlotOutput {
    pub(crate) slot: Slot,
    pub(crate) crashed: bool,
    pub(crate) reachable_transaction_managers: Vec<ParticipantIndex>,
    pub(crate) reachable_lease_managers: Vec<ParticipantIndex>,
    pub(crate) suspects: BTreeSet<ParticipantId>,
}

#[derive(Debug)]
pub(crate) struct AdoptLogOutput {
    pub(crate) adopted: bool,
}

/// A same-slot race we lost: before using `lease` we must hear from `winner` that it let go of
/// its overlapping grant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Contention {
    pub(crate) slot: Slot,
    pub(crate) lease: Lease,
    pub(crate) winner: ParticipantId,
    pub(crate) winner_index: ParticipantIndex,
}

#[derive(Debug)]
pub(crate) struct ApplyStatusInput {
    pub(crate) decided: Vec<DecidedSlot>,
}

#[derive(Debug)]
pub(crate) struct ApplyStatusOutput {
    pub(crate) contentions: Vec<Contention>,
}

/// A pending transaction that holds every lease it needs.
#[derive(Clone, Debug)]
pub(crate) struct CommitPlan {
    pub(crate) tx_id: TxId,
    pub(crate) writes: Vec<KeyValue>,
}

// ------- Peer to peer --------

#[derive(Clone, Debug)]
pub(crate) struct TxPrepareInput {
    pub(crate) coordinator: ParticipantId,
    pub(crate) tx_id: TxId,
    pub(crate) slot: Slot,
}

#[derive(Clone, Debug)]
pub(crate) struct TxPrepareOutput {
    pub(crate) vote: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct TxCommitInput {
    pub(crate) coordinator: ParticipantId,
    pub(crate) tx_id: TxId,
    pub(crate) writes: Vec<KeyValue>,
}

#[derive(Debug)]
pub(crate) struct TxCommitOutput {
    // Nothing
}

#[derive(Clone, Debug)]
pub(crate) struct UpdateOutput {
    pub(crate) write_log: Vec<KeyValue>,
}

#[derive(Clone, Debug)]
pub(crate) struct SameSlotLeaseExecutionInput {
    pub(crate) slot: Slot,
    pub(crate) lease: Lease,
}

#[derive(Debug)]
pub(crate) struct SameSlotLeaseExecutionOutput {
    // Nothing
}

#[derive(Clone, Debug)]
pub(crate) struct SuspicionInput {
    pub(crate) suspect: ParticipantId,
}

#[derive(Clone, Debug)]
pub(crate) struct SuspicionOutput {
    pub(crate) suspected: bool,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TransactionManagerError {
    #[error("participant {0:?} is not a transaction manager")]
    NotInRoster(ParticipantIndex),
    // Pending transactions are dropped when the local log is replaced by the majority's.
    #[error("transaction discarded during log recovery")]
    Discarded,
    #[error("transaction manager actor has exited")]
    ActorExited,
}
