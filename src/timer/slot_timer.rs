use crate::quorum::SlotError;
use crate::timer::stop_signal;
use crate::timer::time::{Clock, RealClock};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// A role's per-slot work. One call per slot, never concurrent with itself.
#[async_trait::async_trait]
pub(crate) trait SlotDriver: Send + Sync + 'static {
    /// `token` is cancelled when the next slot begins. The call is awaited to completion before
    /// the next slot is prepared, so implementations must return promptly once it fires.
    async fn prepare_slot(&self, token: CancellationToken) -> Result<(), SlotError>;
}

/// Keeps the slot clock running. Dropping the handle stops it at the next tick.
pub(crate) struct SlotTimerHandle {
    _stopper: stop_signal::Stopper,
}

impl SlotTimerHandle {
    pub(crate) fn spawn_timer_task<D: SlotDriver>(
        logger: slog::Logger,
        first_slot_at: Instant,
        slot_duration: Duration,
        driver: D,
    ) -> Self {
        // Add minimal logic in this constructor, as it is untested.
        let (task, handle) = SlotTimerTask::new(logger, first_slot_at, slot_duration, driver, RealClock);
        tokio::task::spawn(task.run());

        handle
    }
}

struct SlotTimerTask<D: SlotDriver, C: Clock> {
    logger: slog::Logger,
    next_tick: Instant,
    slot_duration: Duration,
    driver: D,
    clock: C,
    stop_check: stop_signal::StopCheck,
}

impl<D: SlotDriver, C: Clock> SlotTimerTask<D, C> {
    fn new(
        logger: slog::Logger,
        first_slot_at: Instant,
        slot_duration: Duration,
        driver: D,
        clock: C,
    ) -> (Self, SlotTimerHandle) {
        let (stopper, stop_check) = stop_signal::new();

        let task = SlotTimerTask {
            logger,
            next_tick: first_slot_at,
            slot_duration,
            driver,
            clock,
            stop_check,
        };

        (task, SlotTimerHandle { _stopper: stopper })
    }

    async fn run(mut self) {
        let mut previous_token: Option<CancellationToken> = None;

        loop {
            self.clock.sleep_until(self.next_tick).await;

            if let Some(token) = previous_token.take() {
                token.cancel();
            }
            if self.stop_check.should_stop() {
                slog::info!(self.logger, "Slot timer stopped");
                return;
            }

            self.next_tick += self.slot_duration;
            let token = CancellationToken::new();
            previous_token = Some(token.clone());

            let next_tick = self.next_tick;
            let mut deadline_clock = self.clock.clone();
            let mut work = self.driver.prepare_slot(token.clone());

            let result = tokio::select! {
                result = &mut work => result,
                _ = deadline_clock.sleep_until(next_tick) => {
                    // Overran the slot. Pending quorum waits give up now.
                    token.cancel();
                    work.await
                }
            };

            if let Err(e) = result {
                slog::warn!(self.logger, "Slot work ended early: {}", e);
            }

            let now = self.clock.now();
            if now > next_tick {
                slog::warn!(self.logger, "Slot work returned {:?} after its slot ended", now - next_tick);
            }
        }
    }
}
