//! Awaitable wrappers around the blocking engine calls
//!
//! Each call moves its inputs onto the blocking pool and hands back a future
//! bound to a oneshot receiver. RSA signing in particular is too slow to run
//! on a reactor thread.

use crate::{
    engine::{EncodeOptions, TokenEngine},
    error::{JwtError, JwtResult},
    keys::Key,
    types::Token,
};
use serde::Serialize;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Future for token generation
#[derive(Debug)]
pub struct TokenGenerationFuture {
    rx: oneshot::Receiver<JwtResult<Token>>,
}

impl TokenGenerationFuture {
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<Token>>) -> Self {
        Self { rx }
    }
}

impl Future for TokenGenerationFuture {
    type Output = JwtResult<Token>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Future for token verification
#[derive(Debug)]
pub struct TokenVerificationFuture {
    rx: oneshot::Receiver<JwtResult<serde_json::Value>>,
}

impl TokenVerificationFuture {
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<serde_json::Value>>) -> Self {
        Self { rx }
    }
}

impl Future for TokenVerificationFuture {
    type Output = JwtResult<serde_json::Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl TokenEngine {
    /// [`encode_with`](Self::encode_with) on the blocking pool
    ///
    /// # Panics
    /// When called outside a Tokio runtime.
    pub fn encode_async<C>(&self, claims: C, key: Key, options: EncodeOptions) -> TokenGenerationFuture
    where
        C: Serialize + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let engine = self.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(engine.encode_with(&claims, &key, &options));
        });
        TokenGenerationFuture::new(rx)
    }

    /// [`decode`](Self::decode) on the blocking pool
    ///
    /// # Panics
    /// When called outside a Tokio runtime.
    pub fn decode_async(&self, token: impl Into<String>, key: Key) -> TokenVerificationFuture {
        let (tx, rx) = oneshot::channel();
        let engine = self.clone();
        let token = token.into();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(engine.decode(&token, &key));
        });
        TokenVerificationFuture::new(rx)
    }
}
