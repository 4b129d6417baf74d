use crate::cluster::{ParticipantIndex, Slot};

/// Failure of a single outbound call. Always recovered at the call site: the peer is just left out
/// of the quorum for this round.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PeerError {
    #[error("no such participant {0:?}")]
    UnknownParticipant(ParticipantIndex),
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("rpc failed: {0}")]
    Rpc(#[from] tonic::Status),
    #[error("peer reported a fault: {0}")]
    ServerFault(String),
    #[error("peer sent a malformed reply")]
    MalformedReply,
    #[error("peer actor has exited")]
    ActorExited,
    #[error("call abandoned at end of slot")]
    Cancelled,
    #[error("call timed out")]
    Timeout,
}

impl From<tonic::transport::Error> for PeerError {
    fn from(e: tonic::transport::Error) -> Self {
        PeerError::Connect(e.to_string())
    }
}

/// Ends the current slot's work early. Never fatal to the process; the next slot retries.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SlotError {
    #[error("only {reachable} participants can answer but {required} are required")]
    MajorityInsufficiency { reachable: usize, required: usize },
    #[error("slot {0:?} ended before a quorum was reached")]
    SlotExecutionTimeout(Slot),
    #[error("local actor has exited")]
    ActorExited,
}
