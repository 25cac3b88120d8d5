//! Process-wide request pacing.
//!
//! Every request from every clone of the client goes through one
//! [`GlobalRateLimiter`]. The admission check, the sleep, and the timestamp
//! update all happen under a single FIFO-fair async mutex, so concurrent
//! callers cannot observe the same stale timestamp and burst past the ceiling.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ConfigError;

/// Enforces a minimum interval between admitted requests.
#[derive(Debug)]
pub struct GlobalRateLimiter {
    rps: f64,
    min_interval: Duration,
    last_admitted: Mutex<Option<Instant>>,
}

impl GlobalRateLimiter {
    /// Create a limiter admitting at most `rps` requests per second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `rps` is not a
    /// positive number or its interval cannot be represented.
    pub fn new(rps: f64) -> Result<Self, ConfigError> {
        if !(rps.is_finite() && rps > 0.0) {
            return Err(ConfigError::invalid("requests_per_second", format!("must be > 0, got {rps}")));
        }

        let min_interval = Duration::try_from_secs_f64(1.0 / rps).map_err(|e| {
            ConfigError::invalid("requests_per_second", format!("interval out of range: {e}"))
        })?;

        Ok(Self { rps, min_interval, last_admitted: Mutex::new(None) })
    }

    /// Configured requests per second.
    #[must_use]
    pub const fn rps(&self) -> f64 {
        self.rps
    }

    /// Minimum gap between two admissions.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for a slot and return how long this caller slept.
    ///
    /// Callers are admitted in the order they reached the lock. The first
    /// admission never sleeps.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_admitted.lock().await;

        let mut slept = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                slept = self.min_interval - elapsed;
                tokio::time::sleep(slept).await;
            }
        }

        *last = Some(Instant::now());
        slept
    }
}
