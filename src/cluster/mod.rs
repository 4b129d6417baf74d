mod ids;
mod roster;
mod schedule;

pub use ids::ParticipantId;
pub(crate) use ids::ParticipantIndex;
pub use ids::Slot;
pub(crate) use roster::Member;
pub(crate) use roster::Roster;
pub use schedule::ProcessState;
pub use schedule::SlotSchedule;

#[cfg(test)]
pub(crate) use roster::localhost_roster;
