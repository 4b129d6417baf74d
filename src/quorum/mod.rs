mod channel;
mod error;
mod fan_out;

pub(crate) use channel::lazy_channel;
pub(crate) use error::PeerError;
pub(crate) use error::SlotError;
pub(crate) use fan_out::ensure_reachable;
pub(crate) use fan_out::fan_out;
pub(crate) use fan_out::FanOut;
