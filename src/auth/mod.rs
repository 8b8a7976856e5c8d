pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::SessionGuard;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims};

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name for the new account, 2 to 50 characters.
    #[validate(length(min = 2, max = 50))]
    pub username: String,
    /// Email address for the new account. Must be syntactically valid and
    /// at most 100 characters; uniqueness is enforced against the store.
    #[validate(length(min = 3, max = 100), email)]
    pub email: String,
    /// Password for the new account, 3 to 50 characters.
    #[validate(length(min = 3, max = 50))]
    pub password: String,
}

/// Payload for a sign-in request. No field validation happens here; an
/// unknown email or a wrong password both come back as 403.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful signup or signin. The token embeds the user
/// id and is expected back in the `token` header on every protected call.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            username: "pat".to_string(),
            email: "pat@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(valid.validate().is_ok());

        // Username below the 2-character floor.
        let short_username = SignupRequest {
            username: "p".to_string(),
            email: "pat@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(short_username.validate().is_err());

        let bad_email = SignupRequest {
            username: "pat".to_string(),
            email: "patexample.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let long_email = SignupRequest {
            username: "pat".to_string(),
            email: format!("{}@example.com", "a".repeat(100)),
            password: "hunter2".to_string(),
        };
        assert!(long_email.validate().is_err());

        // Password below the 3-character floor.
        let short_password = SignupRequest {
            username: "pat".to_string(),
            email: "pat@example.com".to_string(),
            password: "ab".to_string(),
        };
        assert!(short_password.validate().is_err());

        let long_password = SignupRequest {
            username: "pat".to_string(),
            email: "pat@example.com".to_string(),
            password: "a".repeat(51),
        };
        assert!(long_password.validate().is_err());
    }

    #[test]
    fn test_validation_reports_each_failing_field() {
        let all_wrong = SignupRequest {
            username: "p".to_string(),
            email: "nope".to_string(),
            password: "a".repeat(51),
        };
        let errors = all_wrong.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
