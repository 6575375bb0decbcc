// =============================================================================
// Resilient price-series fetching: bounded retry with jittered backoff
// =============================================================================
//
// A fetch is a loop of at most `max_attempts` source calls.  Transport
// errors, vendor error envelopes and empty responses all count as failed
// attempts; between attempts the loop waits on an exponential backoff whose
// delay doubles and gains a random jitter increment each round.  Failures
// never escape to the caller: an exhausted fetch yields an empty series and
// the reasons live in the log.

use std::time::Duration;

use futures_util::future::BoxFuture;
use rand::Rng;
use tracing::{debug, error, warn};

use crate::market_data::PriceSeries;
use crate::source::PriceSource;
use crate::types::Interval;

/// Bars requested per fetch (roughly one year of daily data).
pub const DEFAULT_OUTPUT_SIZE: u32 = 365;

/// Retry limits for a single logical fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
        }
    }
}

/// Exponential backoff schedule.  Jitter feeds back into the stored delay, so
/// it compounds into every later wait.
#[derive(Debug, Clone)]
pub struct Backoff {
    delay_secs: f64,
}

impl Backoff {
    pub fn new(initial: Duration) -> Self {
        Self {
            delay_secs: initial.as_secs_f64(),
        }
    }

    /// Take the current delay and advance the schedule: the next delay is
    /// double the current one plus `jitter` seconds.
    pub fn next_delay(&mut self, jitter: f64) -> Duration {
        let current = self.delay_secs;
        self.delay_secs = current * 2.0 + jitter;
        Duration::from_secs_f64(current)
    }
}

/// Random source for backoff jitter, in seconds.
pub type JitterSource = Box<dyn Fn() -> f64 + Send + Sync>;

/// Async sleep used between attempts.
pub type SleepFn = Box<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Fetches price series through a [`PriceSource`] with bounded retries.
pub struct PriceSeriesFetcher<S> {
    source: S,
    policy: RetryPolicy,
    jitter: JitterSource,
    sleep: SleepFn,
}

impl<S: PriceSource> PriceSeriesFetcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, RetryPolicy::default())
    }

    pub fn with_policy(source: S, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            jitter: Box::new(|| rand::rng().random::<f64>()),
            sleep: Box::new(|delay| Box::pin(tokio::time::sleep(delay))),
        }
    }

    /// Replace the jitter source (tests pin it to a constant).
    pub fn with_jitter(mut self, jitter: JitterSource) -> Self {
        self.jitter = jitter;
        self
    }

    /// Replace the sleep implementation (tests swap in a no-op).
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    /// Fetch `symbol` at `interval`, retrying on errors and empty responses.
    ///
    /// Makes at most `policy.max_attempts` source calls, sleeping on the
    /// backoff schedule between them.  Never fails: when the final attempt
    /// still has no bars the result is an empty series.
    pub async fn fetch(&self, symbol: &str, interval: Interval) -> PriceSeries {
        let max_attempts = self.policy.max_attempts;
        let mut backoff = Backoff::new(self.policy.initial_backoff);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self
                .source
                .time_series(symbol, interval, DEFAULT_OUTPUT_SIZE)
                .await
            {
                Ok(series) if !series.is_empty() => {
                    debug!(
                        symbol,
                        interval = %interval,
                        bars = series.len(),
                        attempt,
                        "price series fetched"
                    );
                    return series;
                }
                Ok(_) => {
                    warn!(symbol, attempt, max_attempts, "source returned no bars");
                }
                Err(e) => {
                    warn!(symbol, attempt, max_attempts, error = %e, "fetch attempt failed");
                }
            }

            if attempt >= max_attempts {
                error!(
                    symbol,
                    interval = %interval,
                    attempts = attempt,
                    "no data after final attempt, returning empty series"
                );
                return PriceSeries::empty(symbol, interval);
            }

            let delay = backoff.next_delay((self.jitter)());
            debug!(
                symbol,
                delay_secs = delay.as_secs_f64(),
                "backing off before retry"
            );
            (self.sleep)(delay).await;
        }
    }
}
