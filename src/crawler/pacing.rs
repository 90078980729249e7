//! Request pacing
//!
//! Every fixed delay of the pipeline (between index pages, between detail
//! pages, between download batches and between retry attempts) goes through a
//! [`Pacer`], so the waits can be observed and skipped in tests.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Suspends the current task between requests
pub trait Pacer: Send + Sync {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Pacer backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Pacer that records every requested pause and returns immediately
#[derive(Debug, Clone, Default)]
pub struct InstantPacer {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl InstantPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pauses requested so far, in order
    pub fn pauses(&self) -> Vec<Duration> {
        match self.pauses.lock() {
            Ok(pauses) => pauses.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Pacer for InstantPacer {
    async fn pause(&self, duration: Duration) {
        match self.pauses.lock() {
            Ok(mut pauses) => pauses.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
    }
}
