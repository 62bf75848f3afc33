use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Caps the number of in-flight requests against one upstream host.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
}

static EDGAR_RATE_LIMITER: OnceCell<RateLimiter> = OnceCell::new();

impl RateLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        RateLimiter {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| anyhow!("Rate limiter semaphore closed"))
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    // SEC fair-access policy: 10 requests per second
    pub fn edgar() -> &'static RateLimiter {
        EDGAR_RATE_LIMITER.get_or_init(|| RateLimiter::new(10))
    }
}
