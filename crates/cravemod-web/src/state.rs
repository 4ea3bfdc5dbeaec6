use std::sync::Arc;

use cravemod_core::LoginLimiter;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Login attempts per client identifier; owned by this process only.
    pub login_limiter: Arc<LoginLimiter>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let limiter_config = config.rate_limit.limiter_config()?;
        Ok(Self {
            config: Arc::new(config),
            login_limiter: Arc::new(LoginLimiter::new(limiter_config)),
        })
    }
}
