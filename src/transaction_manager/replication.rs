use crate::cluster::{ParticipantId, ParticipantIndex, Slot};
use crate::quorum::{ensure_reachable, fan_out, SlotError};
use crate::transaction_manager::store::most_common_log;
use crate::transaction_manager::{CommitPlan, KeyValue, TransactionManagerPeers, TxCommitInput, TxPrepareInput};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Collect a majority of write logs, ourselves included, and pick the one they agree on.
pub(crate) async fn reconcile_log<T: TransactionManagerPeers>(
    logger: &slog::Logger,
    peers: &Arc<T>,
    slot: Slot,
    reachable: &[ParticipantIndex],
    majority: usize,
    token: &CancellationToken,
) -> Result<Option<Vec<KeyValue>>, SlotError> {
    ensure_reachable(reachable.len(), majority)?;

    let replies = fan_out(logger, slot, token, reachable, |peer| {
        let peers = peers.clone();
        async move { peers.update(peer).await }
    })
    .quorum(majority)
    .await?;

    let logs = replies.into_iter().map(|(_, reply)| reply.write_log).collect();
    Ok(most_common_log(logs))
}

/// Where we stand in the transaction manager cluster for one slot's 2PC rounds.
pub(crate) struct CommitRound<'a> {
    pub(crate) coordinator: &'a ParticipantId,
    pub(crate) coordinator_index: ParticipantIndex,
    pub(crate) slot: Slot,
    pub(crate) reachable: &'a [ParticipantIndex],
    pub(crate) majority: usize,
}

/// Two-phase commit of `plan` across the reachable transaction managers. Our own vote and ack
/// count toward the majority, but we only apply the writes locally once this returns Ok.
pub(crate) async fn two_phase_commit<T: TransactionManagerPeers>(
    logger: &slog::Logger,
    peers: &Arc<T>,
    round: &CommitRound<'_>,
    plan: &CommitPlan,
    token: &CancellationToken,
) -> Result<(), SlotError> {
    let participants: Vec<ParticipantIndex> = round
        .reachable
        .iter()
        .copied()
        .filter(|peer| *peer != round.coordinator_index)
        .collect();
    let needed = round.majority.saturating_sub(1);
    ensure_reachable(participants.len() + 1, round.majority)?;

    let prepare = TxPrepareInput {
        coordinator: round.coordinator.clone(),
        tx_id: plan.tx_id.clone(),
        slot: round.slot,
    };
    fan_out(logger, round.slot, token, &participants, |peer| {
        let peers = peers.clone();
        let input = prepare.clone();
        async move { peers.prepare(peer, input).await }
    })
    .until(needed, |reply| reply.vote)
    .await?;

    let commit = TxCommitInput {
        coordinator: round.coordinator.clone(),
        tx_id: plan.tx_id.clone(),
        writes: plan.writes.clone(),
    };
    fan_out(logger, round.slot, token, &participants, |peer| {
        let peers = peers.clone();
        let input = commit.clone();
        async move { peers.commit(peer, input).await }
    })
    .quorum(needed)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction_manager::local_peers::LocalTransactionManagerCluster;
    use crate::transaction_manager::{TxId, TxSubmitInput};
    use crate::test_utils::test_logger;

    fn indices(n: u32) -> Vec<ParticipantIndex> {
        (0..n).map(ParticipantIndex::new).collect()
    }

    fn plan(id: &str, writes: &[(&str, i64)]) -> CommitPlan {
        CommitPlan {
            tx_id: TxId::new(id),
            writes: writes.iter().map(|(k, v)| KeyValue::new(*k, *v)).collect(),
        }
    }

    #[tokio::test]
    async fn commit_reaches_the_other_members() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        let token = CancellationToken::new();
        let reachable = indices(3);
        let coordinator = ParticipantId::new("TM0");
        let round = CommitRound {
            coordinator: &coordinator,
            coordinator_index: ParticipantIndex::new(0),
            slot: Slot::new(1),
            reachable: &reachable,
            majority: 2,
        };

        two_phase_commit(&test_logger(), cluster.peers(), &round, &plan("TM0-1", &[("x", 1)]), &token)
            .await
            .expect("commit succeeds");

        // The coordinator applies locally only after finishing the commit.
        assert!(cluster.client(0).snapshot().await.unwrap().write_log.is_empty());
        for index in 1..3 {
            let log = cluster.client(index).snapshot().await.unwrap().write_log;
            assert_eq!(log, vec![KeyValue::new("x", 1)]);
        }
    }

    #[tokio::test]
    async fn commit_needs_a_majority() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        cluster.disconnect(1);
        cluster.disconnect(2);
        let token = CancellationToken::new();
        let reachable = indices(3);
        let coordinator = ParticipantId::new("TM0");
        let round = CommitRound {
            coordinator: &coordinator,
            coordinator_index: ParticipantIndex::new(0),
            slot: Slot::new(1),
            reachable: &reachable,
            majority: 2,
        };

        let result =
            two_phase_commit(&test_logger(), cluster.peers(), &round, &plan("TM0-1", &[("x", 1)]), &token).await;
        assert!(matches!(result, Err(SlotError::MajorityInsufficiency { .. })));

        // Nobody applied anything.
        for index in 0..3 {
            assert!(cluster.client(index).snapshot().await.unwrap().write_log.is_empty());
        }

        // Fails fast when the schedule already rules out a majority.
        let alone = vec![ParticipantIndex::new(0)];
        let round = CommitRound {
            reachable: &alone,
            ..round
        };
        let result =
            two_phase_commit(&test_logger(), cluster.peers(), &round, &plan("TM0-2", &[("x", 2)]), &token).await;
        assert!(matches!(
            result,
            Err(SlotError::MajorityInsufficiency { reachable: 1, required: 2 })
        ));
    }

    #[tokio::test]
    async fn lagging_member_learns_the_majority_log() {
        let cluster = LocalTransactionManagerCluster::spawn(3);
        let token = CancellationToken::new();
        let reachable = indices(3);
        let coordinator = ParticipantId::new("TM0");
        let round = CommitRound {
            coordinator: &coordinator,
            coordinator_index: ParticipantIndex::new(0),
            slot: Slot::new(1),
            reachable: &reachable,
            majority: 2,
        };

        // TM2 misses the commit.
        cluster.disconnect(2);
        two_phase_commit(&test_logger(), cluster.peers(), &round, &plan("TM0-1", &[("x", 1)]), &token)
            .await
            .unwrap();
        cluster.reconnect(2);

        let survivors = vec![ParticipantIndex::new(1), ParticipantIndex::new(2)];
        let chosen = reconcile_log(&test_logger(), cluster.peers(), Slot::new(2), &survivors, 2, &token)
            .await
            .unwrap();
        // {TM1, TM2} disagree, one entry each: the longer log wins the tie.
        assert_eq!(chosen, Some(vec![KeyValue::new("x", 1)]));

        let tm2 = cluster.client(2);
        assert!(tm2.adopt_log(vec![KeyValue::new("x", 1)]).await.unwrap().adopted);
        assert_eq!(tm2.snapshot().await.unwrap().values.get("x"), Some(&1));

        // A pending transaction on a member that falls behind is discarded on adoption.
        let submit = {
            let tm2 = tm2.clone();
            tokio::spawn(async move {
                tm2.tx_submit(TxSubmitInput {
                    client_id: "c".into(),
                    reads: vec!["x".into()],
                    writes: Vec::new(),
                })
                .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        tm2.adopt_log(vec![KeyValue::new("x", 1), KeyValue::new("x", 2)])
            .await
            .unwrap();
        assert!(submit.await.unwrap().is_err());
    }
}
