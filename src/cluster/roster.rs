use crate::cluster::{ParticipantId, ParticipantIndex};
use std::net::SocketAddr;

#[derive(Clone, Debug)]
pub(crate) struct Member {
    pub(crate) id: ParticipantId,
    pub(crate) addr: SocketAddr,
}

/// Roster is the ordered membership of one role (all LMs, or all TMs). Order matters: it defines
/// participant indices and the successor ring used for leader election.
#[derive(Clone, Debug)]
pub(crate) struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub(crate) fn new(members: Vec<Member>) -> Self {
        Roster { members }
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    /// ⌊N/2⌋+1
    pub(crate) fn majority(&self) -> usize {
        (self.members.len() / 2) + 1
    }

    pub(crate) fn index_of(&self, id: &ParticipantId) -> Option<ParticipantIndex> {
        self.members
            .iter()
            .position(|m| &m.id == id)
            .map(|i| ParticipantIndex::new(i as u32))
    }

    pub(crate) fn member(&self, index: ParticipantIndex) -> Option<&Member> {
        self.members.get(index.as_usize())
    }

    pub(crate) fn id(&self, index: ParticipantIndex) -> Option<&ParticipantId> {
        self.member(index).map(|m| &m.id)
    }

    /// The next participant in ring order. The last member's successor is the first.
    pub(crate) fn successor(&self, index: ParticipantIndex) -> ParticipantIndex {
        let next = (index.as_usize() + 1) % self.members.len().max(1);
        ParticipantIndex::new(next as u32)
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = ParticipantIndex> {
        (0..self.members.len() as u32).map(ParticipantIndex::new)
    }

    pub(crate) fn members(&self) -> &[Member] {
        &self.members
    }
}

#[cfg(test)]
pub(crate) fn localhost_roster(prefix: &str, num_members: usize, port_base: u16) -> Roster {
    use std::net::{Ipv4Addr, SocketAddrV4};

    let members = (0..num_members)
        .map(|i| Member {
            id: ParticipantId::new(format!("{}{}", prefix, i)),
            addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port_base + i as u16)),
        })
        .collect();

    Roster::new(members)
}
