use crate::cluster::{ParticipantIndex, Slot};
use crate::quorum::{fan_out, SlotError};
use crate::transaction_manager::{Contention, SameSlotLeaseExecutionInput, SuspicionInput, TransactionManagerPeers};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum RendezvousOutcome {
    /// The winner let go of its overlapping lease.
    Released,
    /// A majority agrees the winner is crashed, so there's nobody to wait for.
    WinnerDown,
    /// Neither happened this slot. Try again next slot.
    Deferred,
}

/// Our view of the transaction manager cluster during one slot.
pub(crate) struct RendezvousView<'a> {
    pub(crate) my_index: ParticipantIndex,
    pub(crate) slot: Slot,
    pub(crate) reachable: &'a [ParticipantIndex],
    pub(crate) majority: usize,
    pub(crate) suspect_winner: bool,
}

/// Settle a same-slot race we lost. If we don't suspect the winner we wait for it to release;
/// otherwise we ask everyone else whether they also think it crashed.
pub(crate) async fn resolve<T: TransactionManagerPeers>(
    logger: &slog::Logger,
    peers: &Arc<T>,
    view: &RendezvousView<'_>,
    contention: &Contention,
    token: &CancellationToken,
) -> Result<RendezvousOutcome, SlotError> {
    let outcome = if view.suspect_winner {
        suspicion_consensus(logger, peers, view, contention, token).await
    } else {
        wait_for_release(logger, peers, view.slot, contention, token).await
    };

    match outcome {
        Ok(outcome) => Ok(outcome),
        Err(SlotError::MajorityInsufficiency { reachable, required }) => {
            slog::info!(
                logger,
                "Deferring lease {:?} lost to {:?}: {} of {} needed",
                contention.lease.permissions,
                contention.winner,
                reachable,
                required
            );
            Ok(RendezvousOutcome::Deferred)
        }
        Err(e) => Err(e),
    }
}

async fn wait_for_release<T: TransactionManagerPeers>(
    logger: &slog::Logger,
    peers: &Arc<T>,
    slot: Slot,
    contention: &Contention,
    token: &CancellationToken,
) -> Result<RendezvousOutcome, SlotError> {
    let input = SameSlotLeaseExecutionInput {
        slot: contention.slot,
        lease: contention.lease.clone(),
    };

    fan_out(logger, slot, token, &[contention.winner_index], |winner| {
        let peers = peers.clone();
        let input = input.clone();
        async move { peers.same_slot_lease_execution(winner, input).await }
    })
    .quorum(1)
    .await?;

    Ok(RendezvousOutcome::Released)
}

async fn suspicion_consensus<T: TransactionManagerPeers>(
    logger: &slog::Logger,
    peers: &Arc<T>,
    view: &RendezvousView<'_>,
    contention: &Contention,
    token: &CancellationToken,
) -> Result<RendezvousOutcome, SlotError> {
    let voters: Vec<ParticipantIndex> = view
        .reachable
        .iter()
        .copied()
        .filter(|peer| *peer != view.my_index && *peer != contention.winner_index)
        .collect();
    let input = SuspicionInput {
        suspect: contention.winner.clone(),
    };

    // We suspect the winner ourselves, which is one vote.
    fan_out(logger, view.slot, token, &voters, |peer| {
        let peers = peers.clone();
        let input = input.clone();
        async move { peers.suspicion(peer, input).await }
    })
    .until(view.majority.saturating_sub(1), |reply| reply.suspected)
    .await?;

    slog::info!(logger, "Majority suspects {:?}, skipping its release", contention.winner);
    Ok(RendezvousOutcome::WinnerDown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ParticipantId, ProcessState, SlotSchedule};
    use crate::lease::Lease;
    use crate::transaction_manager::local_peers::LocalTransactionManagerCluster;
    use crate::test_utils::test_logger;
    use std::time::Duration;

    fn contention() -> Contention {
        Contention {
            slot: Slot::new(1),
            lease: Lease::new("TM1", vec!["x"]),
            winner: ParticipantId::new("TM0"),
            winner_index: ParticipantIndex::new(0),
        }
    }

    fn view(reachable: &[ParticipantIndex], suspect_winner: bool) -> RendezvousView<'_> {
        RendezvousView {
            my_index: ParticipantIndex::new(1),
            slot: Slot::new(1),
            reachable,
            majority: 2,
            suspect_winner,
        }
    }

    fn suspecting(id: &str) -> ProcessState {
        ProcessState {
            crashed: false,
            suspects: vec![ParticipantId::new(id)].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn winner_that_never_held_the_lease_releases_once_it_folds() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        let token = CancellationToken::new();
        let reachable: Vec<_> = (0..3).map(ParticipantIndex::new).collect();

        let mut pending = {
            let peers = cluster.peers().clone();
            let token = token.clone();
            tokio::spawn(async move {
                resolve(&test_logger(), &peers, &view(&reachable, false), &contention(), &token).await
            })
        };

        // TM0 hasn't folded slot 1 yet, so the call is parked.
        tokio::time::timeout(Duration::from_millis(20), &mut pending)
            .await
            .expect_err("still waiting on TM0");

        cluster.fold(0, 1, vec![Lease::new("TM0", vec!["x"]), Lease::new("TM1", vec!["x"])]).await;
        cluster.client(0).end_slot().await.unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .expect("released")
            .unwrap()
            .unwrap();
        assert_eq!(outcome, RendezvousOutcome::Released);
    }

    #[tokio::test]
    async fn slot_end_abandons_the_wait() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        let token = CancellationToken::new();
        let reachable: Vec<_> = (0..3).map(ParticipantIndex::new).collect();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = resolve(&test_logger(), cluster.peers(), &view(&reachable, false), &contention(), &token).await;
        assert!(matches!(result, Err(SlotError::SlotExecutionTimeout(_))));
    }

    #[tokio::test]
    async fn unreachable_winner_defers() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        cluster.disconnect(0);
        let token = CancellationToken::new();
        let reachable: Vec<_> = (0..3).map(ParticipantIndex::new).collect();

        let outcome = resolve(&test_logger(), cluster.peers(), &view(&reachable, false), &contention(), &token)
            .await
            .unwrap();
        assert_eq!(outcome, RendezvousOutcome::Deferred);
    }

    #[tokio::test]
    async fn majority_suspicion_skips_the_wait() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_secs(60));
        schedule.set_state(Slot::new(1), "TM1", suspecting("TM0"));
        schedule.set_state(Slot::new(1), "TM2", suspecting("TM0"));
        let cluster = LocalTransactionManagerCluster::spawn_with_schedule(3, schedule);
        cluster.begin_slot_all().await;
        let token = CancellationToken::new();
        let reachable: Vec<_> = (1..3).map(ParticipantIndex::new).collect();

        let outcome = resolve(&test_logger(), cluster.peers(), &view(&reachable, true), &contention(), &token)
            .await
            .unwrap();
        assert_eq!(outcome, RendezvousOutcome::WinnerDown);
    }

    #[tokio::test]
    async fn lone_suspicion_defers() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_secs(60));
        schedule.set_state(Slot::new(1), "TM1", suspecting("TM0"));
        let cluster = LocalTransactionManagerCluster::spawn_with_schedule(3, schedule);
        cluster.begin_slot_all().await;
        let token = CancellationToken::new();
        let reachable: Vec<_> = (0..3).map(ParticipantIndex::new).collect();

        let outcome = resolve(&test_logger(), cluster.peers(), &view(&reachable, true), &contention(), &token)
            .await
            .unwrap();
        assert_eq!(outcome, RendezvousOutcome::Deferred);
    }
}
