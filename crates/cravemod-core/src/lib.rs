//! Cravemod core library: login admission control for the moderation dashboard.
//!
//! `cravemod-core` holds the state that is worth testing in isolation from
//! HTTP: the per-client sliding-window limiter that guards the admin login.
//!
//! # Modules
//!
//! - [`limiter`]: [`LoginLimiter`] and its [`LimiterConfig`].
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod error;
pub mod limiter;

pub use error::{CoreError, CoreResult};
pub use limiter::{LimiterConfig, LoginLimiter, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW};
