use crate::cluster::{ParticipantId, Slot};
use crate::lease::{DecidedSlot, Lease};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
struct HeldLease {
    lease: Lease,
    granted_in: Slot,
    // Won a same-slot race, so it is only ours until this slot ends.
    release_at_slot_end: bool,
    // Lost a same-slot race to this owner, and can't be used until it lets go.
    waiting_on: Option<ParticipantId>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct FoldOutcome {
    pub(crate) acquired: Vec<Lease>,
    pub(crate) revoked: Vec<Lease>,
    pub(crate) contested: Vec<Lease>,
}

/// LeaseTable is one transaction manager's view of which leases it holds, built by folding the
/// lease managers' decided history in order. Each decided slot is folded exactly once.
#[derive(Debug)]
pub(crate) struct LeaseTable {
    me: ParticipantId,
    held: Vec<HeldLease>,
    folded_through: Slot,
}

impl LeaseTable {
    pub(crate) fn new(me: ParticipantId) -> Self {
        LeaseTable {
            me,
            held: Vec::new(),
            folded_through: Slot::default(),
        }
    }

    pub(crate) fn folded_through(&self) -> Slot {
        self.folded_through
    }

    /// Fold every decided slot we haven't seen yet. Within a slot, the decided order is the
    /// priority order: an earlier grant beats a later overlapping one.
    pub(crate) fn fold(&mut self, history: &[DecidedSlot]) -> FoldOutcome {
        let mut outcome = FoldOutcome::default();

        for decided in history {
            if decided.slot <= self.folded_through {
                continue;
            }

            for (position, lease) in decided.leases.iter().enumerate() {
                if lease.owner == self.me {
                    self.fold_mine(decided, position, &mut outcome);
                } else {
                    self.fold_theirs(decided.slot, lease, &mut outcome);
                }
            }

            self.folded_through = decided.slot;
        }

        outcome
    }

    fn fold_mine(&mut self, decided: &DecidedSlot, position: usize, outcome: &mut FoldOutcome) {
        let lease = &decided.leases[position];
        if self.held.iter().any(|h| h.lease == *lease) {
            return;
        }

        let waiting_on = decided.leases[..position]
            .iter()
            .rev()
            .find(|earlier| earlier.owner != self.me && earlier.overlaps(lease))
            .map(|winner| winner.owner.clone());

        self.held.push(HeldLease {
            lease: lease.clone(),
            granted_in: decided.slot,
            release_at_slot_end: false,
            waiting_on,
        });
        outcome.acquired.push(lease.clone());
    }

    fn fold_theirs(&mut self, slot: Slot, theirs: &Lease, outcome: &mut FoldOutcome) {
        let mut kept = Vec::with_capacity(self.held.len());

        for mut held in self.held.drain(..) {
            if !held.lease.overlaps(theirs) {
                kept.push(held);
            } else if held.granted_in == slot {
                // Same slot and decided earlier than theirs: we won, but only for this slot.
                if !held.release_at_slot_end {
                    held.release_at_slot_end = true;
                    outcome.contested.push(held.lease.clone());
                }
                kept.push(held);
            } else {
                outcome.revoked.push(held.lease);
            }
        }

        self.held = kept;
    }

    /// Is `key` covered by any lease we hold, usable or not.
    pub(crate) fn covers(&self, key: &str) -> bool {
        self.held.iter().any(|h| h.lease.covers(key))
    }

    /// Is `key` covered by a lease we may act on right now.
    pub(crate) fn ready(&self, key: &str) -> bool {
        self.held
            .iter()
            .any(|h| h.lease.covers(key) && h.waiting_on.is_none())
    }

    /// The lost race blocking `key`, if that's the only thing between us and the key.
    pub(crate) fn contention(&self, key: &str) -> Option<(Slot, Lease, ParticipantId)> {
        if self.ready(key) {
            return None;
        }

        self.held.iter().find_map(|h| match &h.waiting_on {
            Some(winner) if h.lease.covers(key) => Some((h.granted_in, h.lease.clone(), winner.clone())),
            _ => None,
        })
    }

    /// The winner let go (or is gone), so the lease is ours to use.
    pub(crate) fn clear_contention(&mut self, slot: Slot, lease: &Lease) {
        for held in self.held.iter_mut() {
            if held.granted_in == slot && held.lease == *lease {
                held.waiting_on = None;
            }
        }
    }

    /// Drop every lease we only held for this slot.
    pub(crate) fn release_contested(&mut self) -> Vec<Lease> {
        let (released, kept): (Vec<HeldLease>, Vec<HeldLease>) =
            self.held.drain(..).partition(|h| h.release_at_slot_end);
        self.held = kept;

        released.into_iter().map(|h| h.lease).collect()
    }

    /// Has the same-slot race over `lease` in `slot` been settled on our side: we folded that
    /// slot, and nothing we hold from it or earlier overlaps the lease anymore.
    pub(crate) fn has_released(&self, slot: Slot, lease: &Lease) -> bool {
        self.folded_through >= slot
            && !self
                .held
                .iter()
                .any(|h| h.granted_in <= slot && h.lease.overlaps(lease))
    }

    /// Forget every lease. Folding progress is kept: the history doesn't change under us.
    pub(crate) fn clear(&mut self) {
        self.held.clear();
    }

    pub(crate) fn held_keys(&self) -> BTreeSet<String> {
        self.held
            .iter()
            .flat_map(|h| h.lease.permissions.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decided(slot: u64, leases: Vec<Lease>) -> DecidedSlot {
        DecidedSlot {
            slot: Slot::new(slot),
            leases,
        }
    }

    #[test]
    fn my_leases_are_acquired_once() {
        let mut table = LeaseTable::new("TM1".into());
        let x = Lease::new("TM1", vec!["x"]);

        let history = vec![decided(1, vec![x.clone()])];
        assert_eq!(table.fold(&history).acquired, vec![x.clone()]);
        assert!(table.ready("x"));
        assert!(!table.covers("y"));

        // Already folded slots are skipped.
        assert_eq!(table.fold(&history), FoldOutcome::default());
        assert_eq!(table.folded_through(), Slot::new(1));
    }

    #[test]
    fn later_grant_to_another_owner_revokes() {
        let mut table = LeaseTable::new("TM1".into());
        let history = vec![
            decided(1, vec![Lease::new("TM1", vec!["x", "y"]), Lease::new("TM1", vec!["z"])]),
            decided(2, vec![Lease::new("TM2", vec!["y"])]),
        ];

        let outcome = table.fold(&history);
        assert_eq!(outcome.revoked, vec![Lease::new("TM1", vec!["x", "y"])]);
        assert!(!table.covers("x"));
        assert!(table.ready("z"));
        assert!(table.has_released(Slot::new(2), &Lease::new("TM2", vec!["y"])));
    }

    #[test]
    fn same_slot_winner_keeps_lease_until_slot_end() {
        let mut table = LeaseTable::new("TM1".into());
        let mine = Lease::new("TM1", vec!["x"]);
        let theirs = Lease::new("TM2", vec!["x"]);

        let outcome = table.fold(&[decided(2, vec![mine.clone(), theirs.clone()])]);
        assert_eq!(outcome.contested, vec![mine.clone()]);
        assert!(table.ready("x"));
        assert!(!table.has_released(Slot::new(2), &theirs));

        assert_eq!(table.release_contested(), vec![mine]);
        assert!(!table.covers("x"));
        assert!(table.has_released(Slot::new(2), &theirs));
    }

    #[test]
    fn same_slot_loser_waits_for_winner() {
        let mut table = LeaseTable::new("TM2".into());
        let theirs = Lease::new("TM1", vec!["x"]);
        let mine = Lease::new("TM2", vec!["x", "y"]);

        table.fold(&[decided(2, vec![theirs, mine.clone()])]);
        assert!(table.covers("x"));
        assert!(!table.ready("x"));
        assert_eq!(
            table.contention("y"),
            Some((Slot::new(2), mine.clone(), ParticipantId::new("TM1")))
        );

        table.clear_contention(Slot::new(2), &mine);
        assert!(table.ready("x"));
        assert_eq!(table.contention("x"), None);
    }

    #[test]
    fn chained_same_slot_races_wait_on_the_closest_predecessor() {
        let mut table = LeaseTable::new("TM3".into());
        table.fold(&[decided(
            4,
            vec![
                Lease::new("TM1", vec!["x"]),
                Lease::new("TM2", vec!["x"]),
                Lease::new("TM3", vec!["x"]),
            ],
        )]);

        let (_, _, winner) = table.contention("x").expect("lost the race");
        assert_eq!(winner, ParticipantId::new("TM2"));
    }

    #[test]
    fn release_requires_folding_the_slot() {
        let table = LeaseTable::new("TM1".into());
        assert!(!table.has_released(Slot::new(1), &Lease::new("TM2", vec!["x"])));
    }

    #[test]
    fn clear_keeps_fold_progress() {
        let mut table = LeaseTable::new("TM1".into());
        table.fold(&[decided(3, vec![Lease::new("TM1", vec!["x"])])]);

        table.clear();
        assert!(table.held_keys().is_empty());
        assert_eq!(table.folded_through(), Slot::new(3));
    }
}
