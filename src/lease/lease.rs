use crate::cluster::{ParticipantId, Slot};
use crate::grpc::{ProtoDecidedSlot, ProtoLease};
use std::collections::BTreeSet;

/// A claim by one transaction manager over a set of keys. Immutable once decided.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct Lease {
    pub(crate) owner: ParticipantId,
    pub(crate) permissions: BTreeSet<String>,
}

impl Lease {
    pub(crate) fn new<I, K>(owner: impl Into<ParticipantId>, permissions: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Lease {
            owner: owner.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn overlaps(&self, other: &Lease) -> bool {
        self.permissions.intersection(&other.permissions).next().is_some()
    }

    pub(crate) fn covers(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }
}

/// The value one Paxos instance decided, tagged with the slot it was decided in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DecidedSlot {
    pub(crate) slot: Slot,
    pub(crate) leases: Vec<Lease>,
}

impl From<Lease> for ProtoLease {
    fn from(lease: Lease) -> Self {
        ProtoLease {
            owner: lease.owner.into_inner(),
            permissions: lease.permissions.into_iter().collect(),
        }
    }
}

impl From<ProtoLease> for Lease {
    fn from(proto: ProtoLease) -> Self {
        Lease::new(proto.owner, proto.permissions)
    }
}

impl From<DecidedSlot> for ProtoDecidedSlot {
    fn from(decided: DecidedSlot) -> Self {
        ProtoDecidedSlot {
            slot: decided.slot.as_u64(),
            leases: decided.leases.into_iter().map(ProtoLease::from).collect(),
        }
    }
}

impl From<ProtoDecidedSlot> for DecidedSlot {
    fn from(proto: ProtoDecidedSlot) -> Self {
        DecidedSlot {
            slot: Slot::new(proto.slot),
            leases: proto.leases.into_iter().map(Lease::from).collect(),
        }
    }
}
