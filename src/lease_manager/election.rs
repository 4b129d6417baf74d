use crate::cluster::{ParticipantIndex, Roster, Slot, SlotSchedule};

/// The leader of `slot` is the lowest-indexed lease manager that is not crashed and that its ring
/// successor does not suspect. When everyone is ruled out there is no leader, and buffered
/// requests wait for a later slot.
pub(crate) fn elect_leader(schedule: &SlotSchedule, slot: Slot, roster: &Roster) -> Option<ParticipantIndex> {
    roster.indices().find(|candidate| {
        let candidate_id = match roster.id(*candidate) {
            Some(id) => id,
            None => return false,
        };
        if schedule.is_crashed(slot, candidate_id) {
            return false;
        }

        match roster.id(roster.successor(*candidate)) {
            Some(successor_id) if successor_id != candidate_id => {
                !schedule.suspects(slot, successor_id, candidate_id)
            }
            _ => true,
        }
    })
}
