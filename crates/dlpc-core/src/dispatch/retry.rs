use std::thread;
use std::time::Duration;

use log::warn;

use crate::transport::TransportError;

/// Bounded retry for transient transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        backoff: Duration::ZERO,
    };

    /// One retry after `backoff`.
    pub const fn once(backoff: Duration) -> Self {
        Self {
            retries: 1,
            backoff,
        }
    }
}

/// Run `op`, retrying transient failures according to `policy`.
///
/// Non-transient errors and the error of the last allowed attempt are
/// returned unchanged.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use dlpc_core::TransportError;
/// use dlpc_core::dispatch::{RetryPolicy, retry_transient};
///
/// let mut attempts = 0;
/// let result = retry_transient(RetryPolicy::once(Duration::ZERO), || {
///     attempts += 1;
///     if attempts == 1 {
///         Err(TransportError::Timeout { timeout_ms: 10 })
///     } else {
///         Ok(attempts)
///     }
/// });
/// assert_eq!(result.unwrap(), 2);
/// ```
pub fn retry_transient<T>(
    policy: RetryPolicy,
    mut op: impl FnMut() -> Result<T, TransportError>,
) -> Result<T, TransportError> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.retries && err.is_transient() => {
                attempt += 1;
                warn!(
                    "transient transport failure ({err}), retry {attempt}/{} in {:?}",
                    policy.retries, policy.backoff
                );
                thread::sleep(policy.backoff);
            }
            Err(err) => return Err(err),
        }
    }
}
