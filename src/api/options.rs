use std::convert::TryFrom;
use tokio::time::Duration;

/// Tuning knobs shared by both server roles. Unset fields take their defaults.
#[derive(Clone, Debug, Default)]
pub struct SlotOptions {
    /// How long to wait before the first slot begins.
    pub start_delay: Option<Duration>,
    /// Bound on events queued for a server's actor before callers wait.
    pub actor_queue_size: Option<usize>,
}

pub(super) struct SlotOptionsValidated {
    pub start_delay: Duration,
    pub actor_queue_size: usize,
}

impl SlotOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.actor_queue_size == 0 {
            return Err("Actor queue size must be positive");
        }

        Ok(())
    }
}

impl TryFrom<SlotOptions> for SlotOptionsValidated {
    type Error = &'static str;

    fn try_from(options: SlotOptions) -> Result<Self, Self::Error> {
        let values = SlotOptionsValidated {
            start_delay: options.start_delay.unwrap_or(Duration::from_millis(0)),
            actor_queue_size: options.actor_queue_size.unwrap_or(64),
        };

        values.validate()?;
        Ok(values)
    }
}
