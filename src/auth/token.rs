use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_SECS: i64 = 60 * 60 * 24; // 24 hours

/// Claims carried inside a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the authenticated user.
    pub sub: i32,
    /// Expiry timestamp, seconds since epoch.
    pub exp: usize,
}

fn signing_secret() -> Result<String, AppError> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::InternalServerError("JWT_SECRET not set".into()))
}

/// Issues a signed token embedding `user_id`, valid for 24 hours.
///
/// Requires the `JWT_SECRET` environment variable; a missing secret is a
/// server-side failure, not an authentication failure.
pub fn issue_token(user_id: i32) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL_SECS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(signing_secret()?.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to issue token: {}", e)))
}

/// Verifies a token and returns its claims.
///
/// A malformed token, a bad signature, and an expired token all collapse
/// into the same 403 so the response never reveals which check failed.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(signing_secret()?.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Forbidden("Invalid or expired token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static JWT_ENV_LOCK: Mutex<()> = Mutex::new(());

    // Serializes tests that touch the JWT_SECRET environment variable and
    // restores the original value afterwards, even on panic.
    fn with_jwt_secret<F>(secret_value: &str, test_logic: F)
    where
        F: FnOnce(),
    {
        let _guard = JWT_ENV_LOCK.lock().unwrap();

        let original = std::env::var("JWT_SECRET").ok();
        std::env::set_var("JWT_SECRET", secret_value);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test_logic));

        match original {
            Some(value) => std::env::set_var("JWT_SECRET", value),
            None => std::env::remove_var("JWT_SECRET"),
        }

        if let Err(payload) = result {
            std::panic::resume_unwind(payload);
        }
    }

    #[test]
    fn test_issued_token_round_trips() {
        with_jwt_secret("round-trip-secret", || {
            let token = issue_token(7).unwrap();
            let claims = verify_token(&token).unwrap();
            assert_eq!(claims.sub, 7);
        });
    }

    #[test]
    fn test_expired_token_is_rejected() {
        with_jwt_secret("expiry-secret", || {
            let expiration = chrono::Utc::now()
                .checked_sub_signed(chrono::Duration::hours(2))
                .expect("valid timestamp")
                .timestamp() as usize;

            let stale = encode(
                &Header::default(),
                &Claims {
                    sub: 3,
                    exp: expiration,
                },
                &EncodingKey::from_secret("expiry-secret".as_bytes()),
            )
            .unwrap();

            match verify_token(&stale) {
                Err(AppError::Forbidden(msg)) => {
                    assert_eq!(msg, "Invalid or expired token");
                }
                other => panic!("expected 403 for an expired token, got {:?}", other),
            }
        });
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        with_jwt_secret("secret-a", || {
            let expiration = chrono::Utc::now()
                .checked_add_signed(chrono::Duration::hours(1))
                .expect("valid timestamp")
                .timestamp() as usize;

            let forged = encode(
                &Header::default(),
                &Claims {
                    sub: 3,
                    exp: expiration,
                },
                &EncodingKey::from_secret("secret-b".as_bytes()),
            )
            .unwrap();

            assert!(matches!(
                verify_token(&forged),
                Err(AppError::Forbidden(_))
            ));
        });
    }

    #[test]
    fn test_missing_secret_is_a_server_error() {
        let _guard = JWT_ENV_LOCK.lock().unwrap();

        let original = std::env::var("JWT_SECRET").ok();
        std::env::remove_var("JWT_SECRET");

        let issued = issue_token(1);
        let verified = verify_token("whatever");

        if let Some(value) = original {
            std::env::set_var("JWT_SECRET", value);
        }

        assert!(matches!(issued, Err(AppError::InternalServerError(_))));
        assert!(matches!(verified, Err(AppError::InternalServerError(_))));
    }
}
