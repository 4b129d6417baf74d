use crate::lease_manager::paxos::{self, ProposeOutcome};
use crate::lease_manager::{LeaseManagerClient, PaxosPeers};
use crate::quorum::SlotError;
use crate::timer::SlotDriver;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Drives one lease manager through its slots: tick the actor, and run the round if it made us
/// the slot's leader.
pub(crate) struct LeaseManagerDriver<P: PaxosPeers> {
    logger: slog::Logger,
    actor_client: LeaseManagerClient,
    peers: Arc<P>,
    majority: usize,
}

impl<P: PaxosPeers> LeaseManagerDriver<P> {
    pub(crate) fn new(logger: slog::Logger, actor_client: LeaseManagerClient, peers: Arc<P>, majority: usize) -> Self {
        LeaseManagerDriver {
            logger,
            actor_client,
            peers,
            majority,
        }
    }
}

#[async_trait::async_trait]
impl<P: PaxosPeers> SlotDriver for LeaseManagerDriver<P> {
    async fn prepare_slot(&self, token: CancellationToken) -> Result<(), SlotError> {
        let output = self
            .actor_client
            .prepare_slot()
            .await
            .map_err(|_| SlotError::ActorExited)?;
        let logger = self.logger.new(slog::o!("Slot" => output.slot.as_u64()));

        if output.crashed {
            slog::debug!(logger, "Crashed, skipping slot");
            return Ok(());
        }

        let proposal = match output.proposal {
            Some(proposal) => proposal,
            None => return Ok(()),
        };

        match paxos::propose(&logger, &self.peers, proposal, self.majority, &token).await? {
            ProposeOutcome::Accepted(leases) => {
                slog::info!(logger, "Round accepted {} leases", leases.len());
            }
            ProposeOutcome::Preempted(_) => { /* Logged by the proposer. Wait for next slot. */ }
        }

        Ok(())
    }
}
