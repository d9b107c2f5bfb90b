use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use super::errors::ClientError;

/// How the coordinator actually obtains a new access token. Implemented over
/// HTTP in production; tests substitute their own.
#[async_trait]
pub trait RefreshTransport: Send + Sync + 'static {
    /// Perform one refresh round-trip, returning the new access token
    async fn refresh(&self) -> Result<String, ClientError>;

    /// Called once per failed refresh, before the failure fans out to
    /// waiters. The usual implementation drops local session material.
    async fn on_refresh_failed(&self, _error: &ClientError) {}
}

struct CoordinatorState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<Result<String, ClientError>>>,
}

/// Collapses concurrent token-expiry reactions into one refresh round-trip.
///
/// The first caller to report an expired token starts the refresh; everyone
/// who reports while it is in flight queues behind it and receives the same
/// outcome, in arrival order. The flight itself runs on a spawned task, so a
/// caller that is cancelled mid-wait never strands the queue. Clones share
/// the same queue.
pub struct RefreshCoordinator<T: RefreshTransport> {
    transport: Arc<T>,
    state: Arc<Mutex<CoordinatorState>>,
}

impl<T: RefreshTransport> Clone for RefreshCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: RefreshTransport> RefreshCoordinator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            state: Arc::new(Mutex::new(CoordinatorState {
                refreshing: false,
                waiters: VecDeque::new(),
            })),
        }
    }

    /// Report an expired authorization and wait for a usable access token.
    ///
    /// Exactly one underlying refresh runs no matter how many tasks call
    /// this concurrently.
    pub async fn authorization_expired(&self) -> Result<String, ClientError> {
        let (tx, rx) = oneshot::channel();
        let start_flight = {
            let mut state = self.state.lock().await;
            state.waiters.push_back(tx);
            if state.refreshing {
                false
            } else {
                state.refreshing = true;
                true
            }
        };

        // The flight is detached from this caller so that dropping this
        // future cannot leave the queue stuck mid-refresh
        if start_flight {
            let coordinator = self.clone();
            tokio::spawn(async move { coordinator.drive_refresh().await });
        }

        rx.await.unwrap_or(Err(ClientError::CoordinatorClosed))
    }

    async fn drive_refresh(&self) {
        let result = self.transport.refresh().await;

        if let Err(err) = &result {
            tracing::warn!(error = %err, "Token refresh failed");
            self.transport.on_refresh_failed(err).await;
        }

        let waiters = {
            let mut state = self.state.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        // Fan out in arrival order; a waiter that gave up just drops its
        // receiver, which is fine.
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }
}
