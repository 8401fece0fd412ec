use std::time::Duration;

use crate::ProviderError;

/// Dispatches blocking provider calls onto the blocking thread pool.
///
/// Every provider call crosses this boundary so request handlers and scan
/// tasks never stall the async workers. An optional timeout bounds each call;
/// the blocking thread itself keeps running until the provider returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingCallPolicy {
    timeout: Option<Duration>,
}

impl BlockingCallPolicy {
    /// Creates a policy with an optional per-call timeout.
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Returns the configured per-call timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) async fn run<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(call);

        let joined = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, handle).await.map_err(|_| {
                ProviderError::Unavailable(format!(
                    "provider call timed out after {} ms",
                    timeout.as_millis()
                ))
            })?,
            None => handle.await,
        };

        joined.map_err(|error| {
            ProviderError::Unavailable(format!("provider call did not complete: {error}"))
        })?
    }
}
