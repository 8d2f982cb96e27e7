//! Waiting primitives. `wait_until` polls a predicate against some subject
//! until it holds or a timeout elapses; `settle` is a fixed delay with no
//! observation at all.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::error::JourneyError;

/// Boxed future returned by a check; borrows the subject it inspects.
pub type CheckFuture<'a> = Pin<Box<dyn Future<Output = Result<bool, JourneyError>> + Send + 'a>>;

/// Poll `check(subject)` every `poll` until it yields `true`.
///
/// Errors from the check abort the wait immediately. If `timeout` elapses
/// first the result is [`JourneyError::Timeout`] naming `expected`.
pub async fn wait_until<S, P>(
    subject: &mut S,
    expected: &str,
    timeout: Duration,
    poll: Duration,
    mut check: P,
) -> Result<(), JourneyError>
where
    S: ?Sized + Send,
    P: for<'a> FnMut(&'a mut S) -> CheckFuture<'a>,
{
    let polling = async {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            if check(&mut *subject).await? {
                debug!(expected, attempts, "Wait condition satisfied");
                return Ok::<(), JourneyError>(());
            }
            tokio::time::sleep(poll).await;
        }
    };

    match tokio::time::timeout(timeout, polling).await {
        Ok(result) => result,
        Err(_) => Err(JourneyError::Timeout {
            expected: expected.to_string(),
            waited_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Fixed settling delay, used where the UI may still be updating and there
/// is nothing to observe.
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
