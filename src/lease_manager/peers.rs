use crate::cluster::ParticipantIndex;
use crate::lease_manager::{AcceptInput, AcceptOutput, DecideInput, PrepareInput, PromiseOutput};
use crate::quorum::PeerError;

/// Outbound calls between lease managers. A lease manager also calls itself through this, so a
/// local acceptor is just another acceptor.
#[async_trait::async_trait]
pub(crate) trait PaxosPeers: Send + Sync + 'static {
    async fn prepare(&self, acceptor: ParticipantIndex, input: PrepareInput) -> Result<PromiseOutput, PeerError>;
    async fn accept(&self, acceptor: ParticipantIndex, input: AcceptInput) -> Result<AcceptOutput, PeerError>;
    async fn decide(&self, learner: ParticipantIndex, input: DecideInput) -> Result<(), PeerError>;
}
