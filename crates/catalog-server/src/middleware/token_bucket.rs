//! Token-bucket admission policy
//!
//! Each partition key owns a bucket that starts full. A request takes one
//! token; when the bucket is empty the request parks in a bounded FIFO queue
//! instead of failing outright, and only overflows of that queue are
//! rejected. A periodic replenish pass hands fresh tokens to queued requests
//! oldest first and banks the remainder, never exceeding capacity.
//!
//! Authenticated routes partition by bearer token, so each session gets its
//! own budget. Requests without a token share one fallback bucket; they are
//! turned away by the auth guard afterwards anyway.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use axum::{body::Body, http::Request, response::Response};
use tokio::sync::oneshot;
use tower::{Layer, Service};

use super::{bearer_key, too_many_requests, unix_now_secs};

/// Outcome of asking the bucket for a token
#[derive(Debug)]
pub enum Acquire {
    /// A token was available; proceed immediately
    Granted,
    /// Bucket empty but the queue had room; resolves when a token arrives
    Queued(oneshot::Receiver<()>),
    /// Bucket empty and queue full
    Rejected,
}

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    waiters: VecDeque<oneshot::Sender<()>>,
    /// Unix seconds of the last acquire, for idle eviction
    last_touched: u64,
}

/// Per-key token buckets with bounded FIFO wait queues.
///
/// Interior mutability uses a std `Mutex`; the critical sections never await.
/// Queued requests hold a `oneshot` receiver outside the lock.
#[derive(Debug)]
pub struct TokenBucketPolicy {
    capacity: u32,
    replenish_amount: u32,
    queue_limit: usize,
    idle_after_secs: u64,
    partitions: Mutex<HashMap<String, Bucket>>,
}

impl TokenBucketPolicy {
    pub fn new(capacity: u32, replenish_amount: u32, queue_limit: usize, idle_after_secs: u64) -> Self {
        Self {
            capacity,
            replenish_amount,
            queue_limit,
            idle_after_secs,
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// Take a token for `key`, or join its queue.
    ///
    /// Unknown keys get a fresh bucket filled to capacity, so a new session's
    /// first requests never wait.
    pub fn acquire(&self, key: &str, now_secs: u64) -> Acquire {
        let mut partitions = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let bucket = partitions.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            waiters: VecDeque::new(),
            last_touched: now_secs,
        });
        bucket.last_touched = now_secs;

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            return Acquire::Granted;
        }
        if bucket.waiters.len() < self.queue_limit {
            let (notify, wait) = oneshot::channel();
            bucket.waiters.push_back(notify);
            return Acquire::Queued(wait);
        }
        Acquire::Rejected
    }

    /// Add `replenish_amount` tokens to every bucket.
    ///
    /// Queued requests are served oldest first and each consumes one of the
    /// new tokens; a waiter whose request has since been dropped consumes
    /// nothing. Leftover tokens are banked up to `capacity`. Buckets that
    /// are full, have no waiters, and have not been touched for
    /// `idle_after_secs` are dropped.
    pub fn replenish(&self, now_secs: u64) {
        let mut partitions = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for bucket in partitions.values_mut() {
            let mut granted = 0u32;
            while granted < self.replenish_amount {
                match bucket.waiters.pop_front() {
                    Some(waiter) => {
                        if waiter.send(()).is_ok() {
                            granted += 1;
                        }
                    }
                    None => break,
                }
            }
            bucket.tokens = (bucket.tokens + (self.replenish_amount - granted)).min(self.capacity);
        }

        partitions.retain(|_, bucket| {
            bucket.tokens < self.capacity
                || !bucket.waiters.is_empty()
                || now_secs.saturating_sub(bucket.last_touched) < self.idle_after_secs
        });
    }

    /// Number of partition keys currently tracked
    pub fn partition_count(&self) -> usize {
        self.partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of requests currently queued for `key`
    pub fn queued_count(&self, key: &str) -> usize {
        self.partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|bucket| bucket.waiters.len())
            .unwrap_or(0)
    }
}

// ============================================================================
// Tower layer
// ============================================================================

/// Applies a [`TokenBucketPolicy`] keyed by bearer token
#[derive(Clone)]
pub struct TokenBucketLayer {
    policy: Arc<TokenBucketPolicy>,
}

impl TokenBucketLayer {
    pub fn new(policy: Arc<TokenBucketPolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for TokenBucketLayer {
    type Service = TokenBucketService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenBucketService {
            inner,
            policy: self.policy.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TokenBucketService<S> {
    inner: S,
    policy: Arc<TokenBucketPolicy>,
}

impl<S> Service<Request<Body>> for TokenBucketService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let key = bearer_key(&request);
            match policy.acquire(&key, unix_now_secs()) {
                Acquire::Granted => inner.call(request).await,
                Acquire::Queued(wait) => match wait.await {
                    Ok(()) => inner.call(request).await,
                    // The policy was dropped with this request still queued.
                    Err(_) => Ok(too_many_requests()),
                },
                Acquire::Rejected => {
                    tracing::warn!("Rejected request over bucket and queue capacity");
                    Ok(too_many_requests())
                }
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
