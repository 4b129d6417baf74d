use std::fmt::Debug;
use tokio::sync::oneshot;

/// Reply slot carried by request events. Dropping it unanswered makes the caller's receiver fail,
/// which callers surface as "actor exited".
#[derive(Debug)]
pub(crate) struct Callback<O: Debug, E: Debug>(oneshot::Sender<Result<O, E>>);

impl<O: Debug, E: Debug> Callback<O, E> {
    pub(crate) fn new() -> (Self, oneshot::Receiver<Result<O, E>>) {
        let (tx, rx) = oneshot::channel();
        (Callback(tx), rx)
    }

    pub(crate) fn send(self, message: Result<O, E>) {
        let _ = self.0.send(message);
    }

    /// The caller stopped waiting (e.g. its slot token fired).
    pub(crate) fn is_abandoned(&self) -> bool {
        self.0.is_closed()
    }
}
