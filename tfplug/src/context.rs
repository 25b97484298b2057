//! Request-scoped cancellation and deadlines
//!
//! Every framework call receives a [`Context`]. Providers run their remote
//! calls through [`Context::run`] so that a cancelled or expired request
//! stops waiting on the remote side.

use crate::error::{Result, TfplugError};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    deadline: Option<Instant>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl Context {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(ContextInner {
                deadline: None,
                cancel_tx: Arc::new(cancel_tx),
            }),
        }
    }

    /// A context that expires `timeout` from now and shares this
    /// context's cancellation
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(Instant::now() + timeout),
                cancel_tx: Arc::clone(&self.inner.cancel_tx),
            }),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancel_tx.borrow()
    }

    pub fn is_expired(&self) -> bool {
        self.inner
            .deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    pub fn cancel(&self) {
        self.inner.cancel_tx.send_replace(true);
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(TfplugError::Cancelled);
        }
        if self.is_expired() {
            return Err(TfplugError::DeadlineExceeded);
        }

        let mut rx = self.inner.cancel_tx.subscribe();
        let cancelled = async move {
            loop {
                let is_cancelled = *rx.borrow_and_update();
                if is_cancelled {
                    break;
                }
                if rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };
        let deadline = self.inner.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            output = fut => Ok(output),
            _ = cancelled => Err(TfplugError::Cancelled),
            _ = expired => {
                tracing::debug!("context deadline exceeded");
                Err(TfplugError::DeadlineExceeded)
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn run_returns_future_output() {
        let ctx = Context::new();
        let value = ctx.run(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_stops_at_deadline() {
        let ctx = Context::new().with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                sleep(Duration::from_secs(5)).await;
            })
            .await;
        assert!(matches!(result, Err(TfplugError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn cancelled_context_refuses_work() {
        let ctx = Context::new();
        assert!(!ctx.is_cancelled());

        ctx.cancel();

        assert!(ctx.is_cancelled());
        assert!(matches!(
            ctx.run(async { 1 }).await,
            Err(TfplugError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn cancel_interrupts_running_future() {
        let ctx = Context::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = ctx.run(sleep(Duration::from_secs(5))).await;
        assert!(matches!(result, Err(TfplugError::Cancelled)));
    }

    #[tokio::test]
    async fn timeout_context_follows_parent_cancel() {
        let parent = Context::new();
        let child = parent.clone().with_timeout(Duration::from_secs(5));
        let canceller = parent.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = child.run(sleep(Duration::from_secs(5))).await;
        assert!(matches!(result, Err(TfplugError::Cancelled)));
        assert!(child.is_cancelled());
    }

    #[test]
    fn deadline_is_only_set_with_timeout() {
        let ctx = Context::new();
        assert!(ctx.deadline().is_none());
        assert!(ctx.with_timeout(Duration::from_secs(1)).deadline().is_some());
    }
}
