mod slot_timer;
mod stop_signal;
mod time;

pub(crate) use slot_timer::SlotDriver;
pub(crate) use slot_timer::SlotTimerHandle;
