//! Shutdown coordination for background tasks.

use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator owning the client's background tasks.
///
/// Tasks subscribe to a broadcast channel and exit when it fires;
/// [`Shutdown::shutdown`] triggers the signal and joins every spawned
/// task, so none outlives the client.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Spawn a background task whose handle will be joined on shutdown.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.handles.lock().expect("shutdown handle lock poisoned").push(handle);
    }

    /// Trigger the signal and wait for every spawned task to exit.
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(());
        let handles = {
            let mut guard = self.handles.lock().expect("shutdown handle lock poisoned");
            std::mem::take(&mut *guard)
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
