use std::time::Duration;

use async_trait::async_trait;

/// Source of waiting for retry backoff and status expiry.
#[async_trait]
pub trait Delay: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
