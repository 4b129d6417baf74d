use crate::cluster::{ParticipantIndex, Slot};
use crate::quorum::{PeerError, SlotError};
use std::future::Future;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Replies of concurrent peer calls, in completion order.
pub(crate) struct FanOut<T> {
    logger: slog::Logger,
    slot: Slot,
    token: CancellationToken,
    receiver: mpsc::Receiver<(ParticipantIndex, Result<T, PeerError>)>,
    outstanding: usize,
}

/// Spawn `call` once per target. Every call races the slot token, so nothing outlives the slot.
pub(crate) fn fan_out<T, F, Fut>(
    logger: &slog::Logger,
    slot: Slot,
    token: &CancellationToken,
    targets: &[ParticipantIndex],
    call: F,
) -> FanOut<T>
where
    T: Send + 'static,
    F: Fn(ParticipantIndex) -> Fut,
    Fut: Future<Output = Result<T, PeerError>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(targets.len().max(1));

    for target in targets.iter().copied() {
        let peer_call = call(target);
        let tx = tx.clone();
        let token = token.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                result = peer_call => result,
                _ = token.cancelled() => Err(PeerError::Cancelled),
            };

            // Receiver is gone if the quorum was already reached. That's fine.
            let _ = tx.send((target, result)).await;
        });
    }

    FanOut {
        logger: logger.clone(),
        slot,
        token: token.clone(),
        receiver: rx,
        outstanding: targets.len(),
    }
}

impl<T> FanOut<T> {
    /// Wait for `needed` successful replies and abandon the rest.
    pub(crate) async fn quorum(self, needed: usize) -> Result<Vec<(ParticipantIndex, T)>, SlotError> {
        self.until(needed, |_| true).await
    }

    /// Wait for `needed` successful replies that also satisfy `accept`. Fails as soon as too few
    /// calls remain outstanding for that to happen.
    pub(crate) async fn until<P>(mut self, needed: usize, accept: P) -> Result<Vec<(ParticipantIndex, T)>, SlotError>
    where
        P: Fn(&T) -> bool,
    {
        let mut accepted = Vec::with_capacity(needed);

        while accepted.len() < needed {
            let possible = accepted.len() + self.outstanding;
            if possible < needed {
                return Err(SlotError::MajorityInsufficiency {
                    reachable: possible,
                    required: needed,
                });
            }

            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => return Err(SlotError::SlotExecutionTimeout(self.slot)),
                next = self.receiver.recv() => next,
            };

            match next {
                Some((peer, Ok(reply))) => {
                    self.outstanding -= 1;
                    if accept(&reply) {
                        accepted.push((peer, reply));
                    } else {
                        slog::debug!(self.logger, "Reply from {:?} does not count toward quorum", peer);
                    }
                }
                Some((peer, Err(e))) => {
                    self.outstanding -= 1;
                    slog::warn!(self.logger, "Excluding {:?} from quorum: {}", peer, e);
                }
                // All senders are gone, so nothing is outstanding anymore.
                None => self.outstanding = 0,
            }
        }

        Ok(accepted)
    }
}

/// Fail fast when a quorum operation can't possibly succeed.
pub(crate) fn ensure_reachable(reachable: usize, required: usize) -> Result<(), SlotError> {
    if reachable < required {
        Err(SlotError::MajorityInsufficiency { reachable, required })
    } else {
        Ok(())
    }
}
