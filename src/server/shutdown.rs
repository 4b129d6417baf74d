use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// The server runs until the handle is dropped or `shutdown()` is called.
pub(crate) fn shutdown_signal() -> (ServerShutdownHandle, ServerShutdownSignal) {
    let (tx, rx) = oneshot::channel();

    (ServerShutdownHandle { tx }, ServerShutdownSignal { rx })
}

pub(crate) struct ServerShutdownHandle {
    tx: oneshot::Sender<()>,
}

impl ServerShutdownHandle {
    pub(crate) fn shutdown(self) {
        let _ = self.tx.send(());
    }
}

pub(crate) struct ServerShutdownSignal {
    rx: oneshot::Receiver<()>,
}

impl Future for ServerShutdownSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Sent or dropped, either way we're done.
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_on_shutdown_or_drop() {
        let (handle, mut signal) = shutdown_signal();
        tokio::time::timeout(Duration::from_millis(10), &mut signal)
            .await
            .expect_err("Expected timeout");
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("shutdown() stops the server");

        let (handle, signal) = shutdown_signal();
        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("dropping the handle stops the server");
    }
}
