//! Concrete Future types for offloaded token work.
//!
//! RSA private-key operations take milliseconds, which is too long to run
//! on an async executor thread. These futures hide a oneshot channel fed by
//! tokio's blocking pool.

use crate::{
    error::{JwtError, JwtResult},
    token::Token,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::{runtime::Handle, sync::oneshot};

/// Run `work` on the blocking pool of the current tokio runtime.
///
/// Outside a runtime nothing is spawned; the sender is dropped and the
/// receiving future resolves to [`JwtError::TaskFailed`].
pub(crate) fn offload<T, F>(work: F) -> oneshot::Receiver<JwtResult<T>>
where
    T: Send + 'static,
    F: FnOnce() -> JwtResult<T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(move || {
                let _ = tx.send(work());
            });
        }
        Err(_) => tracing::error!("no tokio runtime available for offloaded token work"),
    }
    rx
}

/// Future for token building.
pub struct TokenBuildFuture {
    rx: oneshot::Receiver<JwtResult<Token>>,
}

impl TokenBuildFuture {
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<Token>>) -> Self {
        Self { rx }
    }
}

impl Future for TokenBuildFuture {
    type Output = JwtResult<Token>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Future for compact-token verification.
pub struct TokenVerifyFuture {
    rx: oneshot::Receiver<JwtResult<Token>>,
}

impl TokenVerifyFuture {
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<Token>>) -> Self {
        Self { rx }
    }
}

impl Future for TokenVerifyFuture {
    type Output = JwtResult<Token>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
