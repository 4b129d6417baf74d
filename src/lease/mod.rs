mod lease;

pub(crate) use lease::DecidedSlot;
pub(crate) use lease::Lease;
