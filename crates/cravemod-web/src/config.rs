use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use cravemod_core::{CoreResult, LimiterConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    /// Public hostname of the dashboard. Requests reaching the server under a
    /// platform default domain are redirected here.
    #[serde(default)]
    pub canonical_host: Option<String>,
    #[serde(default = "default_redirect_host_suffixes")]
    pub redirect_host_suffixes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Argon2 PHC string of the shared admin password.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
    #[serde(default)]
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_hash: String::new(),
            jwt_secret: String::new(),
            session_ttl_hours: default_session_ttl_hours(),
            cookie_secure: false,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_minutes: default_window_minutes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            tls: TlsConfig::default(),
            canonical_host: None,
            redirect_host_suffixes: default_redirect_host_suffixes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9090))
}

fn default_session_ttl_hours() -> u64 { 24 * 7 }
fn default_max_attempts() -> usize { DEFAULT_MAX_ATTEMPTS }
fn default_window_minutes() -> u64 { DEFAULT_WINDOW.as_secs() / 60 }

fn default_redirect_host_suffixes() -> Vec<String> {
    vec!["vercel.app".to_string()]
}

const WEAK_SECRETS: &[&str] = &[
    "change-me-to-a-random-secret",
    "secret",
    "password",
    "jwt-secret",
];

impl RateLimitConfig {
    pub fn limiter_config(&self) -> CoreResult<LimiterConfig> {
        LimiterConfig::new(
            self.max_attempts,
            Duration::from_secs(self.window_minutes.saturating_mul(60)),
        )
    }
}

impl ServerConfig {
    pub fn tls_enabled(&self) -> bool {
        self.tls.cert_path.is_some() && self.tls.key_path.is_some()
    }

    /// Session cookies carry `Secure` when asked to, or whenever we serve TLS.
    pub fn secure_cookies(&self) -> bool {
        self.auth.cookie_secure || self.tls_enabled()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_hours.saturating_mul(3600))
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Builds the config from the file named by `CRAVEMOD_CONFIG` (if any),
    /// then applies `CRAVEMOD_*` overrides looked up through `env`.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = match env("CRAVEMOD_CONFIG").map(PathBuf::from) {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                toml::from_str(&contents)?
            }
            None => ServerConfig::default(),
        };

        if let Some(addr) = env("CRAVEMOD_BIND_ADDR") {
            config.bind_addr = addr.parse()?;
        }
        if let Some(hash) = env("CRAVEMOD_PASSWORD_HASH") {
            config.auth.password_hash = hash;
        }
        if let Some(secret) = env("CRAVEMOD_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Some(val) = env("CRAVEMOD_COOKIE_SECURE") {
            config.auth.cookie_secure = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Some(host) = env("CRAVEMOD_CANONICAL_HOST") {
            config.canonical_host = Some(host).filter(|h| !h.is_empty());
        }
        if let Some(val) = env("CRAVEMOD_LOGIN_MAX_ATTEMPTS") {
            config.rate_limit.max_attempts = val.parse()?;
        }
        if let Some(val) = env("CRAVEMOD_LOGIN_WINDOW_MINUTES") {
            config.rate_limit.window_minutes = val.parse()?;
        }
        if let Some(cert) = env("CRAVEMOD_TLS_CERT") {
            config.tls.cert_path = Some(cert);
        }
        if let Some(key) = env("CRAVEMOD_TLS_KEY") {
            config.tls.key_path = Some(key);
        }

        if config.auth.password_hash.is_empty() {
            anyhow::bail!(
                "No admin password configured. Set CRAVEMOD_PASSWORD_HASH \
                 (generate one with the hash_password binary)."
            );
        }
        argon2::PasswordHash::new(&config.auth.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid admin password hash: {e}"))?;

        if config.auth.jwt_secret.is_empty() {
            config.auth.jwt_secret = uuid::Uuid::new_v4().to_string();
            tracing::warn!(
                "No JWT secret configured. Generated random secret (sessions end on restart)."
            );
        }
        if WEAK_SECRETS.contains(&config.auth.jwt_secret.as_str()) {
            anyhow::bail!(
                "JWT secret matches a known weak/placeholder value. \
                 Set a strong random secret via CRAVEMOD_JWT_SECRET."
            );
        }
        if config.auth.jwt_secret.len() < 32 {
            tracing::warn!(
                "JWT secret is shorter than 32 characters. \
                 Consider using a stronger secret via CRAVEMOD_JWT_SECRET."
            );
        }

        config.rate_limit.limiter_config()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn test_hash() -> String {
        crate::auth::password::hash_password("hunter2").unwrap()
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.rate_limit.max_attempts, 5);
        assert_eq!(config.rate_limit.window_minutes, 15);
        assert_eq!(config.auth.session_ttl_hours, 168);
        assert_eq!(config.redirect_host_suffixes, vec!["vercel.app"]);
        assert!(config.canonical_host.is_none());
    }

    #[test]
    fn toml_sections_are_read() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind_addr = "127.0.0.1:8080"
            canonical_host = "admin.example.com"

            [rate_limit]
            max_attempts = 3
            window_minutes = 10

            [auth]
            cookie_secure = true
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.canonical_host.as_deref(), Some("admin.example.com"));
        assert!(config.secure_cookies());

        let limiter = config.rate_limit.limiter_config().unwrap();
        assert_eq!(limiter.max_attempts(), 3);
        assert_eq!(limiter.window(), Duration::from_secs(600));
    }

    #[test]
    fn load_requires_password_hash() {
        let err = ServerConfig::load_with(env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("No admin password configured"));
    }

    #[test]
    fn load_rejects_malformed_hash() {
        let err = ServerConfig::load_with(env_from(&[("CRAVEMOD_PASSWORD_HASH", "plaintext")]))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid admin password hash"));
    }

    #[test]
    fn load_applies_env_overrides() {
        let hash = test_hash();
        let config = ServerConfig::load_with(env_from(&[
            ("CRAVEMOD_PASSWORD_HASH", hash.as_str()),
            ("CRAVEMOD_BIND_ADDR", "127.0.0.1:7000"),
            ("CRAVEMOD_JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("CRAVEMOD_LOGIN_MAX_ATTEMPTS", "7"),
            ("CRAVEMOD_LOGIN_WINDOW_MINUTES", "30"),
            ("CRAVEMOD_CANONICAL_HOST", "admin.example.com"),
            ("CRAVEMOD_COOKIE_SECURE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.rate_limit.max_attempts, 7);
        assert_eq!(config.rate_limit.window_minutes, 30);
        assert_eq!(config.canonical_host.as_deref(), Some("admin.example.com"));
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.jwt_secret, "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn load_generates_jwt_secret_when_missing() {
        let hash = test_hash();
        let config = ServerConfig::load_with(env_from(&[("CRAVEMOD_PASSWORD_HASH", hash.as_str())]))
            .unwrap();
        assert!(!config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn load_rejects_weak_jwt_secret() {
        let hash = test_hash();
        let err = ServerConfig::load_with(env_from(&[
            ("CRAVEMOD_PASSWORD_HASH", hash.as_str()),
            ("CRAVEMOD_JWT_SECRET", "secret"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("weak"));
    }

    #[test]
    fn load_rejects_zero_attempts() {
        let hash = test_hash();
        let err = ServerConfig::load_with(env_from(&[
            ("CRAVEMOD_PASSWORD_HASH", hash.as_str()),
            ("CRAVEMOD_LOGIN_MAX_ATTEMPTS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn tls_requires_both_paths() {
        let mut config = ServerConfig::default();
        config.tls.cert_path = Some("cert.pem".to_string());
        assert!(!config.tls_enabled());
        assert!(!config.secure_cookies());

        config.tls.key_path = Some("key.pem".to_string());
        assert!(config.tls_enabled());
        assert!(config.secure_cookies());
    }

    #[test]
    fn session_ttl_is_hours() {
        let config = ServerConfig::default();
        assert_eq!(config.session_ttl(), Duration::from_secs(7 * 24 * 3600));
    }
}
