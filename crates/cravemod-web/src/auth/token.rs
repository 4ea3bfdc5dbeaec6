use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Subject written into every admin session token.
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

/// Issues a session token for `subject`, valid for `ttl`. Returns the token
/// and its expiry as a unix timestamp.
pub fn create_token(jwt_secret: &str, ttl: Duration, subject: &str) -> anyhow::Result<(String, u64)> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let expires_at = now.saturating_add(ttl.as_secs());

    let claims = Claims {
        sub: subject.to_string(),
        iat: now,
        exp: expires_at,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;

    Ok((token, expires_at))
}

pub fn verify_token(jwt_secret: &str, token: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies() {
        let (token, expires_at) =
            create_token(SECRET, Duration::from_secs(3600), ADMIN_SUBJECT).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, expires_at);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn each_token_has_unique_id() {
        let (a, _) = create_token(SECRET, Duration::from_secs(60), ADMIN_SUBJECT).unwrap();
        let (b, _) = create_token(SECRET, Duration::from_secs(60), ADMIN_SUBJECT).unwrap();
        let a = verify_token(SECRET, &a).unwrap();
        let b = verify_token(SECRET, &b).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = create_token(SECRET, Duration::from_secs(60), ADMIN_SUBJECT).unwrap();
        assert!(verify_token("another-secret-another-secret-xx", &token).is_err());
    }

    #[test]
    fn huge_ttl_saturates_expiry() {
        let (token, expires_at) =
            create_token(SECRET, Duration::from_secs(u64::MAX), ADMIN_SUBJECT).unwrap();
        assert_eq!(expires_at, u64::MAX);
        assert!(!token.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now - 7200,
            exp: now - 3600,
            jti: "stale".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token(SECRET, "authenticated").is_err());
    }
}
