//! Bounded-retry acquisition of external connection handles.
//!
//! Services acquire their database pool and broker connection once at
//! startup. The connector retries a short, fixed number of times and then
//! gives up, so a process exits instead of limping along without one of
//! its dependencies.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

/// Delay schedule applied between consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// The same pause after every failure.
    Fixed(Duration),
    /// A pause of `failures * failures` seconds, growing with each failure.
    Quadratic,
}

impl Policy {
    /// Delay to apply after the given failure count (1-based).
    pub fn delay(&self, failures: u32) -> Duration {
        match self {
            Policy::Fixed(pause) => *pause,
            Policy::Quadratic => Duration::from_secs(u64::from(failures) * u64::from(failures)),
        }
    }
}

/// All attempts were exhausted without acquiring the handle.
#[derive(Debug, Error)]
#[error("gave up on {target} after {attempts} attempts: {last_error}")]
pub struct AcquireError {
    /// What was being acquired, for operator logs.
    pub target: String,
    /// Total attempts made, including the final failing one.
    pub attempts: u32,
    /// Rendering of the last underlying failure.
    pub last_error: String,
}

/// Runs `attempt` until it succeeds or the failure budget is spent.
///
/// Tolerates up to `max_failures` failed attempts, sleeping according to
/// `policy` after each one; the next failure is fatal and reported as an
/// [`AcquireError`].
pub async fn acquire<T, E, F, Fut>(
    target: &str,
    policy: Policy,
    max_failures: u32,
    mut attempt: F,
) -> Result<T, AcquireError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut failures = 0u32;
    loop {
        match attempt().await {
            Ok(handle) => {
                if failures > 0 {
                    info!("{} ready after {} attempts", target, failures + 1);
                }
                return Ok(handle);
            }
            Err(error) => {
                failures += 1;
                if failures > max_failures {
                    return Err(AcquireError {
                        target: target.to_string(),
                        attempts: failures,
                        last_error: error.to_string(),
                    });
                }
                let pause = policy.delay(failures);
                warn!(
                    "{} not ready (attempt {}), backing off for {:?}: {}",
                    target, failures, pause, error
                );
                tokio::time::sleep(pause).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn quadratic_delay_grows_with_failures() {
        assert_eq!(Policy::Quadratic.delay(1), Duration::from_secs(1));
        assert_eq!(Policy::Quadratic.delay(3), Duration::from_secs(9));
        assert_eq!(Policy::Quadratic.delay(5), Duration::from_secs(25));
    }

    #[test]
    fn fixed_delay_is_constant() {
        let policy = Policy::Fixed(Duration::from_secs(2));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(7), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_the_handle_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let started = tokio::time::Instant::now();

        let handle = acquire(
            "postgres",
            Policy::Fixed(Duration::from_secs(2)),
            10,
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                        Err("connection refused")
                    } else {
                        Ok(42u32)
                    }
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(handle, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_once_the_budget_is_spent() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), AcquireError> =
            acquire("message broker", Policy::Quadratic, 5, move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("connection refused")
                }
            })
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.attempts, 6);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert!(error.to_string().contains("message broker"));
    }

    #[tokio::test(start_paused = true)]
    async fn an_immediate_success_skips_the_pause() {
        let started = tokio::time::Instant::now();
        let handle = acquire("postgres", Policy::Fixed(Duration::from_secs(2)), 10, || async {
            Ok::<_, &str>("pool")
        })
        .await
        .unwrap();

        assert_eq!(handle, "pool");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
