use crate::cluster::ParticipantIndex;
use crate::lease::Lease;
use crate::lease_manager::{AcceptInput, Ballot, DecideInput, PaxosPeers, PrepareInput, PromiseOutput, Proposal};
use crate::quorum::{self, SlotError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How a leader's round ended, when it didn't run out of slot or peers.
#[derive(Debug, PartialEq)]
pub(crate) enum ProposeOutcome {
    /// A majority accepted. Learners hear about it from the acceptors.
    Accepted(Vec<Lease>),
    /// Some acceptor already promised a newer ballot. Not an error, we just step down.
    Preempted(Ballot),
}

/// Run the proposer side of one Synod round.
pub(crate) async fn propose<P: PaxosPeers>(
    logger: &slog::Logger,
    peers: &Arc<P>,
    proposal: Proposal,
    majority: usize,
    token: &CancellationToken,
) -> Result<ProposeOutcome, SlotError> {
    let Proposal {
        slot,
        ballot,
        value,
        acceptors,
    } = proposal;
    quorum::ensure_reachable(acceptors.len(), majority)?;

    // Phase 1
    let prepare = PrepareInput { slot, ballot };
    let promises = quorum::fan_out(logger, slot, token, &acceptors, |acceptor| {
        let peers = peers.clone();
        let input = prepare.clone();
        async move { peers.prepare(acceptor, input).await }
    })
    .quorum(majority)
    .await?;

    if let Some(newer) = promises
        .iter()
        .map(|(_, promise)| promise.read_timestamp)
        .filter(|read| *read > ballot)
        .max()
    {
        slog::info!(logger, "Ballot {:?} preempted by {:?}, stepping down", ballot, newer);
        return Ok(ProposeOutcome::Preempted(newer));
    }

    // Phase 2
    let value = choose_value(&promises, value);
    let accept = AcceptInput {
        slot,
        ballot,
        leases: value.clone(),
    };
    quorum::fan_out(logger, slot, token, &acceptors, |acceptor| {
        let peers = peers.clone();
        let input = accept.clone();
        async move { peers.accept(acceptor, input).await }
    })
    .until(majority, |reply| reply.accepted)
    .await?;

    slog::info!(logger, "Ballot {:?} accepted by a majority", ballot);
    Ok(ProposeOutcome::Accepted(value))
}

/// A value some acceptor already accepted wins over our own, newest write first.
fn choose_value(promises: &[(ParticipantIndex, PromiseOutput)], own: Vec<Lease>) -> Vec<Lease> {
    promises
        .iter()
        .map(|(_, promise)| promise)
        .filter(|promise| !promise.write_timestamp.is_none())
        .max_by_key(|promise| promise.write_timestamp)
        .map(|promise| promise.written_values.clone())
        .unwrap_or(own)
}

/// Tell every learner what we accepted. Fire and forget: a learner that misses it just doesn't
/// learn this instance.
pub(crate) fn broadcast_decide<P, I>(logger: &slog::Logger, peers: &Arc<P>, learners: I, input: DecideInput)
where
    P: PaxosPeers,
    I: Iterator<Item = ParticipantIndex>,
{
    for learner in learners {
        let logger = logger.clone();
        let peers = peers.clone();
        let input = input.clone();
        tokio::spawn(async move {
            if let Err(e) = peers.decide(learner, input).await {
                slog::warn!(logger, "Decide to {:?} failed: {}", learner, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ProcessState, Slot, SlotSchedule};
    use crate::lease_manager::local_peers::LocalLeaseManagerCluster;
    use crate::test_utils::test_logger;
    use std::time::Duration;

    fn ballot(round: u64, proposer: u32) -> Ballot {
        Ballot::new(Slot::new(round), ParticipantIndex::new(proposer))
    }

    fn promise(write: Ballot, owner: &str) -> (ParticipantIndex, PromiseOutput) {
        (
            ParticipantIndex::new(0),
            PromiseOutput {
                read_timestamp: ballot(9, 0),
                write_timestamp: write,
                written_values: vec![Lease::new(owner, vec!["x"])],
            },
        )
    }

    #[test]
    fn previously_written_value_wins() {
        let own = vec![Lease::new("TM9", vec!["x"])];

        let promises = vec![
            promise(Ballot::none(), "TM0"),
            promise(ballot(2, 1), "TM1"),
            promise(ballot(3, 0), "TM2"),
        ];
        assert_eq!(choose_value(&promises, own.clone()), vec![Lease::new("TM2", vec!["x"])]);

        let promises = vec![promise(Ballot::none(), "TM0"), promise(Ballot::none(), "TM1")];
        assert_eq!(choose_value(&promises, own.clone()), own);
    }

    fn proposal(slot: u64, proposer: u32, owner: &str, acceptors: &[u32]) -> Proposal {
        Proposal {
            slot: Slot::new(slot),
            ballot: ballot(slot, proposer),
            value: vec![Lease::new(owner, vec!["x"])],
            acceptors: acceptors.iter().copied().map(ParticipantIndex::new).collect(),
        }
    }

    #[tokio::test]
    async fn all_replicas_learn_the_accepted_value() {
        let cluster = LocalLeaseManagerCluster::spawn(3, SlotSchedule::all_normal(Duration::from_secs(60)));
        let token = CancellationToken::new();

        let outcome = propose(&test_logger(), cluster.peers(), proposal(1, 0, "TM1", &[0, 1, 2]), 2, &token)
            .await
            .expect("majority reachable");
        assert_eq!(outcome, ProposeOutcome::Accepted(vec![Lease::new("TM1", vec!["x"])]));

        for index in 0..3 {
            let decided = cluster.wait_decided(index, Slot::new(1)).await;
            assert_eq!(decided, vec![Lease::new("TM1", vec!["x"])], "LM{}", index);
        }
    }

    #[tokio::test]
    async fn majority_of_two_out_of_three_is_enough() {
        let cluster = LocalLeaseManagerCluster::spawn(3, SlotSchedule::all_normal(Duration::from_secs(60)));
        cluster.disconnect(0);
        let token = CancellationToken::new();

        let outcome = propose(&test_logger(), cluster.peers(), proposal(1, 1, "TM1", &[0, 1, 2]), 2, &token)
            .await
            .expect("LM1 and LM2 form a majority");
        assert!(matches!(outcome, ProposeOutcome::Accepted(_)));

        for index in 1..3 {
            assert_eq!(cluster.wait_decided(index, Slot::new(1)).await.len(), 1);
        }
    }

    #[tokio::test]
    async fn too_few_acceptors_fail_fast() {
        let cluster = LocalLeaseManagerCluster::spawn(3, SlotSchedule::all_normal(Duration::from_secs(60)));
        let token = CancellationToken::new();

        let result = propose(&test_logger(), cluster.peers(), proposal(1, 0, "TM1", &[0]), 2, &token).await;
        assert!(matches!(
            result,
            Err(SlotError::MajorityInsufficiency { reachable: 1, required: 2 })
        ));
    }

    #[tokio::test]
    async fn stale_proposer_steps_down_and_decision_is_kept() {
        let cluster = LocalLeaseManagerCluster::spawn(3, SlotSchedule::all_normal(Duration::from_secs(60)));
        let token = CancellationToken::new();
        let logger = test_logger();

        let first = propose(&logger, cluster.peers(), proposal(1, 2, "TM1", &[0, 1, 2]), 2, &token)
            .await
            .unwrap();
        assert!(matches!(first, ProposeOutcome::Accepted(_)));

        // A lower ballot in the same instance is told about the newer promise.
        let second = propose(&logger, cluster.peers(), proposal(1, 0, "TM2", &[0, 1, 2]), 2, &token)
            .await
            .unwrap();
        assert_eq!(second, ProposeOutcome::Preempted(ballot(1, 2)));

        // A higher ballot must re-propose what was already accepted.
        let mut third = proposal(1, 0, "TM2", &[0, 1, 2]);
        third.ballot = ballot(2, 0);
        let third = propose(&logger, cluster.peers(), third, 2, &token).await.unwrap();
        assert_eq!(third, ProposeOutcome::Accepted(vec![Lease::new("TM1", vec!["x"])]));

        for index in 0..3 {
            assert_eq!(
                cluster.wait_decided(index, Slot::new(1)).await,
                vec![Lease::new("TM1", vec!["x"])]
            );
        }
    }

    #[tokio::test]
    async fn value_accepted_by_a_minority_is_carried_forward() {
        let cluster = LocalLeaseManagerCluster::spawn(3, SlotSchedule::all_normal(Duration::from_secs(60)));
        let token = CancellationToken::new();
        let slot = Slot::new(1);

        // Only LM0 accepts TM1's lease, which is not enough to decide.
        let lm0 = cluster.client(0);
        lm0.prepare(PrepareInput {
            slot,
            ballot: ballot(1, 0),
        })
        .await
        .unwrap();
        let accepted = lm0
            .accept(AcceptInput {
                slot,
                ballot: ballot(1, 0),
                leases: vec![Lease::new("TM1", vec!["x"])],
            })
            .await
            .unwrap();
        assert!(accepted.accepted);

        let outcome = propose(&test_logger(), cluster.peers(), proposal(1, 2, "TM2", &[0, 1, 2]), 3, &token)
            .await
            .unwrap();
        assert_eq!(outcome, ProposeOutcome::Accepted(vec![Lease::new("TM1", vec!["x"])]));

        for index in 0..3 {
            assert_eq!(cluster.wait_decided(index, slot).await, vec![Lease::new("TM1", vec!["x"])]);
        }
    }

    #[tokio::test]
    async fn slot_end_cancels_the_round() {
        let mut schedule = SlotSchedule::all_normal(Duration::from_secs(60));
        schedule.set_state(Slot::new(1), "LM1", ProcessState::crashed());
        schedule.set_state(Slot::new(1), "LM2", ProcessState::crashed());
        let cluster = LocalLeaseManagerCluster::spawn(3, schedule);
        // Crashed lease managers hold every request until they recover, which is never here.
        cluster.prepare_all().await;

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = propose(&test_logger(), cluster.peers(), proposal(1, 0, "TM1", &[0, 1, 2]), 2, &token).await;
        assert!(matches!(result, Err(SlotError::SlotExecutionTimeout(_))));
    }
}
