use lazy_static::lazy_static;
use regex::Regex;

use crate::{auth::dto::CredentialsRequest, error::AppError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Normalizes the email (trimmed, lowercased) and checks both fields are usable.
pub(crate) fn validate_credentials(mut req: CredentialsRequest) -> Result<CredentialsRequest, AppError> {
    req.email = req.email.trim().to_lowercase();

    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("sp ace@b.com"));
    }

    #[test]
    fn email_is_normalized() {
        let req = validate_credentials(creds("  A@B.Com ", "secret1")).unwrap();
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.password, "secret1");
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = validate_credentials(creds("a@b.com", "")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn bad_email_is_rejected() {
        let err = validate_credentials(creds("not-an-email", "secret1")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
