use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A long-lived loop that owns its state and stops when the returned sender
/// fires or is dropped.
#[async_trait]
pub trait Runnable: Send + Sized + 'static {
    fn run(self) -> (oneshot::Sender<()>, JoinHandle<()>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(self.run_impl(shutdown_rx));

        (shutdown_tx, handle)
    }

    async fn run_impl(self, shutdown_rx: oneshot::Receiver<()>);
}
