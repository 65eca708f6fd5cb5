//! Graceful shutdown controller.
//!
//! Listens for SIGINT/SIGTERM and broadcasts a shutdown signal to every
//! subscriber via a `tokio::sync::broadcast` channel.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Coordinates graceful shutdown of the HTTP server and any background task.
///
/// Tasks call [`subscribe`](Self::subscribe) to get a receiver and wait on
/// it. When shutdown is triggered (by OS signal or programmatically), every
/// receiver is notified. Shutdown is latched: a [`signalled`](Self::signalled)
/// future created after the trigger resolves at once.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
    triggered: AtomicBool,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: AtomicBool::new(false),
        }
    }

    /// Get a receiver that will be notified on shutdown.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// A future resolving once shutdown has been triggered, including a
    /// trigger that happened before this call.
    pub fn signalled(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        // Subscribe before reading the latch so a concurrent trigger is
        // seen by one or the other.
        let mut rx = self.subscribe();
        let already = self.is_triggered();
        async move {
            if !already {
                let _ = rx.recv().await;
            }
        }
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    /// Wait for SIGTERM or SIGINT, then trigger shutdown.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { info!("received SIGINT, shutting down"); }
            _ = terminate => { info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
