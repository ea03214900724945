//! Backoff guidance for callers that retry retryable failures
//!
//! The completion client itself never retries; this policy only
//! computes delays for callers that choose to.

use std::time::Duration;
use log::debug;

/// Retry policy for caller-driven retries
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   pub max_retries: usize
  , pub backoff_multiplier: f32
  , pub initial_backoff: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_retries: usize
    , backoff_multiplier: f32
    , initial_backoff_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_retries
          , backoff_multiplier
          , initial_backoff: Duration::from_millis(
              initial_backoff_ms
            )
        }
    }

    /// Build a policy from configuration
    pub fn from_config(
      config: &crate::config::RetryConfig
    ) -> Self
    {   RetryPolicy::new(
          config.max_retries,
          config.backoff_multiplier,
          config.initial_backoff_ms
        )
    }

    /// Calculate backoff duration for attempt number
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        let multiplier
          = self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(
          (self.initial_backoff.as_millis() as f32
            * multiplier) as u64
        )
    }

    /// Delay before the next attempt, or None when the error is not
    /// retryable or the attempt budget is spent.
    pub fn next_delay(
      &self
    , error: &crate::error::Error
    , attempt: usize
    ) -> Option<Duration>
    {   if !error.is_retryable()
        {   return None;
        }

        if attempt >= self.max_retries
        {   debug!(
              "Retry budget exhausted at attempt {}",
              attempt
            );
            return None;
        }

        Some(self.backoff_for_attempt(attempt))
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(3, 2.0, 100)
    }
}
