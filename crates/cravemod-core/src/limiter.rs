//! Sliding-window login admission limiter.
//!
//! [`LoginLimiter`] keeps, per client identifier, the timestamps of recent
//! login attempts. Before every decision the timestamps that have left the
//! window are dropped; the attempt is admitted (and recorded) only while the
//! remaining count is below `max_attempts`.
//!
//! State lives in memory for the life of the process and is not shared
//! between server instances.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::{CoreError, CoreResult};

/// Attempts allowed inside one window when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Length of the sliding window when nothing else is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Throttle parameters for a [`LoginLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    max_attempts: usize,
    window: Duration,
}

impl LimiterConfig {
    /// Builds a config, rejecting values that would make the limiter
    /// meaningless (no attempts at all, or a window that is always empty).
    pub fn new(max_attempts: usize, window: Duration) -> CoreResult<Self> {
        if max_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(CoreError::InvalidConfig(
                "window must be longer than zero".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            window,
        })
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Per-client login attempt table.
///
/// Share it behind an `Arc`; all methods take `&self`. The table is only
/// reachable through these methods.
#[derive(Debug)]
pub struct LoginLimiter {
    attempts: DashMap<String, Vec<Instant>>,
    config: LimiterConfig,
}

impl LoginLimiter {
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            attempts: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Decides whether `client_id` may attempt to log in at `now`.
    ///
    /// Timestamps with `now - t >= window` are discarded first, and the pruned
    /// list is stored back whatever the outcome. Returns `false` without
    /// recording anything when `max_attempts` recent attempts already exist;
    /// otherwise records `now` and returns `true`.
    ///
    /// The shard write guard is held from prune to append, so concurrent
    /// calls for the same key are serialised and cannot both take the last
    /// slot.
    #[must_use]
    pub fn check_and_record_attempt(&self, client_id: &str, now: Instant) -> bool {
        let window = self.config.window;
        let mut entry = self.attempts.entry(client_id.to_owned()).or_default();

        entry.retain(|&t| now.saturating_duration_since(t) < window);

        if entry.len() >= self.config.max_attempts {
            tracing::debug!(
                client_id,
                recent = entry.len(),
                "login attempt rejected by limiter"
            );
            return false;
        }

        entry.push(now);
        true
    }

    /// Forgets every recorded attempt for `client_id`. No-op for unknown keys.
    pub fn reset_on_success(&self, client_id: &str) {
        self.attempts.remove(client_id);
    }

    /// Drops keys whose attempts have all aged out at `now` and prunes the
    /// rest in place. Returns the number of keys removed.
    ///
    /// Only reclaims memory: decisions already ignore expired timestamps.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let window = self.config.window;
        let before = self.attempts.len();
        self.attempts.retain(|_, stamps| {
            stamps.retain(|&t| now.saturating_duration_since(t) < window);
            !stamps.is_empty()
        });
        before.saturating_sub(self.attempts.len())
    }
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new(LimiterConfig::default())
    }
}
