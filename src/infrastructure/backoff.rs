//! Exponential backoff with jitter
//!
//! Each retry interval is the current interval randomized by
//! `randomization_factor`, after which the current interval grows by
//! `multiplier` up to `max_interval`. Retrying stops once the time elapsed
//! since [`ExponentialBackoff::reset`] exceeds `max_elapsed_time`.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

use super::execution::Execution;

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Backoff policy parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub randomization_factor: f64,
    pub multiplier: f64,
    pub max_interval: Duration,
    /// `None` retries forever
    pub max_elapsed_time: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            multiplier: DEFAULT_MULTIPLIER,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed_time: None,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_elapsed_time(mut self, max_elapsed_time: Option<Duration>) -> Self {
        self.max_elapsed_time = max_elapsed_time;
        self
    }

    /// Start a fresh backoff schedule from this policy
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(*self)
    }
}

/// Stateful backoff schedule
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    policy: RetryPolicy,
    current_interval: Duration,
    started: Instant,
}

impl ExponentialBackoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            current_interval: policy.initial_interval,
            started: Instant::now(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Restart the schedule: initial interval, elapsed time zero
    pub fn reset(&mut self) {
        self.current_interval = self.policy.initial_interval;
        self.started = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Delay before the next attempt, or `None` once the elapsed budget is spent
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.policy.max_elapsed_time {
            if self.elapsed() > max_elapsed {
                return None;
            }
        }

        let delay = randomize(self.current_interval, self.policy.randomization_factor);
        self.increment_interval();
        Some(delay)
    }

    fn increment_interval(&mut self) {
        let max = self.policy.max_interval.as_secs_f64();
        let next = self.current_interval.as_secs_f64() * self.policy.multiplier;
        self.current_interval = if next >= max {
            self.policy.max_interval
        } else {
            Duration::from_secs_f64(next)
        };
    }
}

fn randomize(interval: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return interval;
    }
    let secs = interval.as_secs_f64();
    let delta = secs * factor;
    let low = (secs - delta).max(0.0);
    let high = secs + delta;
    Duration::from_secs_f64(rand::thread_rng().gen_range(low..=high))
}

/// Run `op` until it succeeds or `backoff` gives up
///
/// The schedule is reset before the first attempt. When the budget runs out
/// the execution ends with the error of the last attempt.
pub async fn retry<T, E, F, Fut>(backoff: &mut ExponentialBackoff, mut op: F) -> Execution<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    backoff.reset();
    let mut failures = Vec::new();

    loop {
        let err = match op().await {
            Ok(value) => return Execution::from_attempts(failures, Ok(value)),
            Err(err) => err,
        };

        match backoff.next_backoff() {
            Some(delay) => {
                warn!(
                    "Attempt {} failed, retrying in {}: {}",
                    failures.len() + 1,
                    humantime::format_duration(round_millis(delay)),
                    err
                );
                failures.push(err);
                tokio::time::sleep(delay).await;
            }
            None => return Execution::from_attempts(failures, Err(err)),
        }
    }
}

fn round_millis(delay: Duration) -> Duration {
    Duration::from_millis(delay.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_elapsed: Duration) -> RetryPolicy {
        RetryPolicy {
            initial_interval: Duration::from_millis(5),
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: Duration::from_millis(20),
            max_elapsed_time: Some(max_elapsed),
        }
    }

    #[test]
    fn test_intervals_grow_until_capped() {
        let mut backoff = ExponentialBackoff::new(RetryPolicy {
            initial_interval: Duration::from_millis(100),
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: Duration::from_millis(500),
            max_elapsed_time: None,
        });

        let delays: Vec<u128> = (0..5)
            .map(|_| backoff.next_backoff().unwrap().as_millis())
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 500, 500]);

        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.initial_interval, Duration::from_millis(500));
        assert_eq!(policy.multiplier, 1.5);
        assert_eq!(policy.max_elapsed_time, None);
    }

    #[test]
    fn test_randomized_interval_within_bounds() {
        let mut backoff = ExponentialBackoff::new(RetryPolicy {
            initial_interval: Duration::from_millis(1000),
            randomization_factor: 0.5,
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            max_elapsed_time: None,
        });

        for _ in 0..20 {
            backoff.reset();
            let delay = backoff.next_backoff().unwrap();
            assert!(delay >= Duration::from_millis(500));
            assert!(delay <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn test_stops_after_max_elapsed_time() {
        let mut backoff = ExponentialBackoff::new(fast_policy(Duration::from_millis(10)));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let timeout = Duration::from_secs(5);
        let mut backoff = fast_policy(timeout).backoff();
        let calls = AtomicU32::new(0);
        let started = std::time::Instant::now();

        let execution = retry(&mut backoff, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(format!("failure {}", n))
                } else {
                    Ok("deployed")
                }
            }
        })
        .await;

        assert!(started.elapsed() < timeout);
        assert_eq!(execution.attempts(), 4);
        assert_eq!(execution.error_count(), 3);
        assert!(execution.did_error());
        assert!(!execution.did_fail());
        assert_eq!(execution.into_result(), Ok("deployed"));
    }

    #[tokio::test]
    async fn test_retry_gives_up_with_last_error() {
        let timeout = Duration::from_millis(60);
        let mut backoff = fast_policy(timeout).backoff();
        let calls = AtomicU32::new(0);
        let started = std::time::Instant::now();

        let execution = retry(&mut backoff, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), _>(format!("failure {}", n)) }
        })
        .await;

        assert!(started.elapsed() >= timeout);
        assert!(execution.did_fail());
        let attempts = execution.attempts();
        assert!(attempts > 1);
        assert_eq!(
            execution.into_result(),
            Err(format!("failure {}", attempts - 1))
        );
    }

    #[test]
    fn test_retry_first_attempt_success_does_not_sleep() {
        let mut backoff = fast_policy(Duration::from_millis(1)).backoff();
        let execution = tokio_test::block_on(retry(&mut backoff, || async {
            Ok::<_, String>(42)
        }));
        assert_eq!(execution.attempts(), 1);
        assert!(!execution.did_error());
    }
}
