use crate::cluster::{ParticipantId, ParticipantIndex};
use crate::lease::DecidedSlot;
use crate::quorum::{ensure_reachable, fan_out, SlotError};
use crate::timer::SlotDriver;
use crate::transaction_manager::rendezvous::{self, RendezvousOutcome, RendezvousView};
use crate::transaction_manager::replication::{self, CommitRound};
use crate::transaction_manager::{
    ApplyStatusInput, BeginSlotOutput, LeaseManagers, TransactionManagerClient, TransactionManagerError,
    TransactionManagerPeers, TransactionManagerPhase,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Drives one transaction manager through its slots: reconcile the write log, learn new leases,
/// settle lease races, then commit everything that holds its leases.
pub(crate) struct TransactionCoordinator<T: TransactionManagerPeers, L: LeaseManagers> {
    logger: slog::Logger,
    actor_client: TransactionManagerClient,
    peers: Arc<T>,
    lease_managers: Arc<L>,
    my_id: ParticipantId,
    my_index: ParticipantIndex,
    majority: usize,
}

impl<T: TransactionManagerPeers, L: LeaseManagers> TransactionCoordinator<T, L> {
    pub(crate) fn new(
        logger: slog::Logger,
        actor_client: TransactionManagerClient,
        peers: Arc<T>,
        lease_managers: Arc<L>,
        my_id: ParticipantId,
        my_index: ParticipantIndex,
        majority: usize,
    ) -> Self {
        TransactionCoordinator {
            logger,
            actor_client,
            peers,
            lease_managers,
            my_id,
            my_index,
            majority,
        }
    }

    async fn run_slot(
        &self,
        logger: &slog::Logger,
        slot: &BeginSlotOutput,
        token: &CancellationToken,
    ) -> Result<(), SlotError> {
        let reachable = &slot.reachable_transaction_managers;

        let majority_log = replication::reconcile_log(logger, &self.peers, slot.slot, reachable, self.majority, token)
            .await?;
        if let Some(log) = majority_log {
            self.actor_client.adopt_log(log).await.map_err(actor_exited)?;
        }

        self.actor_client
            .enter_phase(TransactionManagerPhase::PollingLeases)
            .await
            .map_err(actor_exited)?;
        let decided = self.poll_leases(logger, slot, token).await?;

        let resolved = self
            .actor_client
            .apply_status(ApplyStatusInput { decided })
            .await
            .map_err(actor_exited)?;
        for contention in resolved.contentions {
            let view = RendezvousView {
                my_index: self.my_index,
                slot: slot.slot,
                reachable,
                majority: self.majority,
                suspect_winner: slot.suspects.contains(&contention.winner),
            };

            match rendezvous::resolve(logger, &self.peers, &view, &contention, token).await? {
                RendezvousOutcome::Released | RendezvousOutcome::WinnerDown => {
                    self.actor_client
                        .clear_contention(contention)
                        .await
                        .map_err(actor_exited)?;
                }
                RendezvousOutcome::Deferred => { /* Logged by rendezvous. Retry next slot. */ }
            }
        }

        let plans = self.actor_client.commit_plans().await.map_err(actor_exited)?;
        let round = CommitRound {
            coordinator: &self.my_id,
            coordinator_index: self.my_index,
            slot: slot.slot,
            reachable,
            majority: self.majority,
        };
        for plan in plans {
            replication::two_phase_commit(logger, &self.peers, &round, &plan, token).await?;
            self.actor_client
                .finish_commit(plan.tx_id)
                .await
                .map_err(actor_exited)?;
        }

        Ok(())
    }

    /// Decided history from any one reachable lease manager. Each of them answers once its own
    /// instance for the slot settled.
    async fn poll_leases(
        &self,
        logger: &slog::Logger,
        slot: &BeginSlotOutput,
        token: &CancellationToken,
    ) -> Result<Vec<DecidedSlot>, SlotError> {
        ensure_reachable(slot.reachable_lease_managers.len(), 1)?;

        let mut replies = fan_out(logger, slot.slot, token, &slot.reachable_lease_managers, |lease_manager| {
            let lease_managers = self.lease_managers.clone();
            async move { lease_managers.status_update(lease_manager).await }
        })
        .quorum(1)
        .await?;

        Ok(replies.pop().map(|(_, reply)| reply.decided).unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl<T: TransactionManagerPeers, L: LeaseManagers> SlotDriver for TransactionCoordinator<T, L> {
    async fn prepare_slot(&self, token: CancellationToken) -> Result<(), SlotError> {
        let slot = self.actor_client.begin_slot().await.map_err(actor_exited)?;
        let logger = self.logger.new(slog::o!("Slot" => slot.slot.as_u64()));

        if slot.crashed {
            slog::debug!(logger, "Crashed, skipping slot");
            return Ok(());
        }

        let result = self.run_slot(&logger, &slot, &token).await;

        // Lease releases and re-requests happen even when the slot's work was cut short.
        self.actor_client.end_slot().await.map_err(actor_exited)?;

        result
    }
}

fn actor_exited(_: TransactionManagerError) -> SlotError {
    SlotError::ActorExited
}
