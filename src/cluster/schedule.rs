use crate::cluster::{ParticipantId, ParticipantIndex, Roster, Slot};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// State of one participant during one slot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessState {
    pub crashed: bool,
    /// Participants this one believes to be crashed.
    pub suspects: BTreeSet<ParticipantId>,
}

impl ProcessState {
    pub fn normal() -> Self {
        ProcessState::default()
    }

    pub fn crashed() -> Self {
        ProcessState {
            crashed: true,
            suspects: BTreeSet::new(),
        }
    }
}

/// SlotSchedule is the externally provided failure script: for each slot, for each participant,
/// whether it is crashed and whom it suspects. Slot 1 is the first entry. Slots past the last
/// entry reuse the last entry. Participants missing from an entry are normal and suspect no one.
#[derive(Clone, Debug)]
pub struct SlotSchedule {
    slot_duration: Duration,
    slots: Vec<HashMap<ParticipantId, ProcessState>>,
}

impl SlotSchedule {
    pub fn new(slot_duration: Duration, slots: Vec<HashMap<ParticipantId, ProcessState>>) -> Self {
        SlotSchedule { slot_duration, slots }
    }

    /// A schedule where nobody ever crashes or suspects anyone.
    pub fn all_normal(slot_duration: Duration) -> Self {
        SlotSchedule::new(slot_duration, Vec::new())
    }

    /// Set `id`'s state for `slot`, growing the schedule as needed. New entries copy the previous
    /// slot's states, the same way the config file inherits unspecified slots.
    pub fn set_state(&mut self, slot: Slot, id: impl Into<ParticipantId>, state: ProcessState) {
        let position = slot.as_u64().max(1) as usize - 1;
        while self.slots.len() <= position {
            let inherited = self.slots.last().cloned().unwrap_or_default();
            self.slots.push(inherited);
        }
        self.slots[position].insert(id.into(), state);
    }

    pub fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn state(&self, slot: Slot, id: &ParticipantId) -> ProcessState {
        self.entry(slot)
            .and_then(|states| states.get(id))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn is_crashed(&self, slot: Slot, id: &ParticipantId) -> bool {
        self.entry(slot)
            .and_then(|states| states.get(id))
            .map(|s| s.crashed)
            .unwrap_or(false)
    }

    /// Does `who` suspect `whom` during `slot`?
    pub(crate) fn suspects(&self, slot: Slot, who: &ParticipantId, whom: &ParticipantId) -> bool {
        self.entry(slot)
            .and_then(|states| states.get(who))
            .map(|s| s.suspects.contains(whom))
            .unwrap_or(false)
    }

    /// Members of `roster` that `me` may contact during `slot`: not crashed per the schedule and not
    /// suspected by me. I am never excluded by my own suspicion list.
    pub(crate) fn reachable(&self, slot: Slot, me: &ParticipantId, roster: &Roster) -> Vec<ParticipantIndex> {
        roster
            .indices()
            .filter(|index| match roster.id(*index) {
                Some(id) => !self.is_crashed(slot, id) && (id == me || !self.suspects(slot, me, id)),
                None => false,
            })
            .collect()
    }

    fn entry(&self, slot: Slot) -> Option<&HashMap<ParticipantId, ProcessState>> {
        if slot.as_u64() == 0 || self.slots.is_empty() {
            return None;
        }

        let position = (slot.as_u64() as usize - 1).min(self.slots.len() - 1);
        self.slots.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::roster::localhost_roster;

    fn suspecting(ids: &[&str]) -> ProcessState {
        ProcessState {
            crashed: false,
            suspects: ids.iter().map(|id| ParticipantId::new(*id)).collect(),
        }
    }

    #[test]
    fn slots_past_the_end_reuse_the_last_entry() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_millis(100));
        schedule.set_state(Slot::new(2), "LM0", ProcessState::crashed());

        assert!(!schedule.is_crashed(Slot::new(1), &"LM0".into()));
        assert!(schedule.is_crashed(Slot::new(2), &"LM0".into()));
        assert!(schedule.is_crashed(Slot::new(9), &"LM0".into()));
        assert_eq!(schedule.num_slots(), 2);
    }

    #[test]
    fn new_entries_inherit_previous_slot() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_millis(100));
        schedule.set_state(Slot::new(1), "TM1", suspecting(&["TM2"]));
        schedule.set_state(Slot::new(3), "TM2", ProcessState::crashed());

        assert!(schedule.suspects(Slot::new(2), &"TM1".into(), &"TM2".into()));
        assert!(schedule.suspects(Slot::new(3), &"TM1".into(), &"TM2".into()));
        assert!(!schedule.is_crashed(Slot::new(2), &"TM2".into()));
    }

    #[test]
    fn slot_zero_and_unknown_participants_are_normal() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_millis(100));
        schedule.set_state(Slot::new(1), "LM0", ProcessState::crashed());

        assert!(!schedule.is_crashed(Slot::new(0), &"LM0".into()));
        assert_eq!(schedule.state(Slot::new(1), &"nobody".into()), ProcessState::normal());
    }

    #[test]
    fn reachable_set() {
        let roster = localhost_roster("TM", 4, 5000);
        let mut schedule = SlotSchedule::all_normal(Duration::from_millis(100));
        schedule.set_state(Slot::new(1), "TM3", ProcessState::crashed());
        schedule.set_state(Slot::new(1), "TM0", suspecting(&["TM1", "TM0"]));

        let reachable = schedule.reachable(Slot::new(1), &"TM0".into(), &roster);
        assert_eq!(reachable, vec![ParticipantIndex::new(0), ParticipantIndex::new(2)]);

        // TM2 has no suspicions, so only the crashed TM3 is excluded.
        let reachable = schedule.reachable(Slot::new(1), &"TM2".into(), &roster);
        assert_eq!(
            reachable,
            vec![
                ParticipantIndex::new(0),
                ParticipantIndex::new(1),
                ParticipantIndex::new(2)
            ]
        );
    }
}
