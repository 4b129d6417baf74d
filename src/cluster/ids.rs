use std::fmt;

/// ParticipantId is the name a process goes by in the cluster config (e.g. "TM1", "LM0").
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        ParticipantId(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId::new(id)
    }
}

/// Position of a participant within its role's roster. Stable for the lifetime of the cluster.
#[derive(Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct ParticipantIndex(u32);

impl ParticipantIndex {
    pub(crate) fn new(index: u32) -> Self {
        ParticipantIndex(index)
    }

    pub(crate) fn as_u32(&self) -> u32 {
        self.0
    }

    pub(crate) fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ParticipantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Slot 0 is "before the first tick". Every process's first prepared slot is 1.
#[derive(Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Slot(u64);

impl Slot {
    pub fn new(slot: u64) -> Self {
        Slot(slot)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(&self) -> Slot {
        Slot(self.0 + 1)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
