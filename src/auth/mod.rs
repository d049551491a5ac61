pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Payload of `POST /api/login/`.
///
/// Both fields default to empty so that a missing field is reported by the
/// handler as a 400 with a uniform message rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Payload of `POST /api/registration/`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationRequest {
    /// Display name. The first word becomes the first name, the rest the last name.
    #[validate(length(max = 150), custom = "validate_fullname")]
    pub fullname: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    /// At least 8 characters and not made of digits only.
    #[validate(length(min = 8, max = 128), custom = "password::validate_not_numeric")]
    pub password: String,
    pub repeated_password: String,
}

impl RegistrationRequest {
    /// Splits `fullname` into `(first_name, last_name)`.
    pub fn name_parts(&self) -> (String, String) {
        let mut parts = self.fullname.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

fn validate_fullname(fullname: &str) -> Result<(), ValidationError> {
    if fullname.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("fullname may not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Response of a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub fullname: String,
    pub email: String,
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(fullname: &str, email: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest {
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            repeated_password: password.to_string(),
        }
    }

    #[test]
    fn test_registration_request_validation() {
        assert!(registration("Ada Lovelace", "ada@example.com", "analytical1")
            .validate()
            .is_ok());

        assert!(registration("   ", "ada@example.com", "analytical1")
            .validate()
            .is_err());
        assert!(registration("Ada", "not-an-email", "analytical1")
            .validate()
            .is_err());
        assert!(registration("Ada", "ada@example.com", "short")
            .validate()
            .is_err());
        assert!(registration("Ada", "ada@example.com", "1234567890")
            .validate()
            .is_err());
    }

    #[test]
    fn test_name_parts() {
        let req = registration("  Grace   Brewster Hopper ", "g@example.com", "password1");
        assert_eq!(
            req.name_parts(),
            ("Grace".to_string(), "Brewster Hopper".to_string())
        );

        let req = registration("Cher", "c@example.com", "password1");
        assert_eq!(req.name_parts(), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn test_login_request_defaults_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert!(req.password.is_empty());
    }
}
