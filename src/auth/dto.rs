use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ApiError, FieldErrors};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) {
            errors.push("email", "must be a valid email address");
        }
        if self.password.len() < 8 {
            errors.push("password", "must be at least 8 characters");
        }
        if self.name.trim().is_empty() {
            errors.push("name", "is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client. `createdAt` is only
/// included where the original API included it (register, me).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(is_valid_email("demo@healthlog.dev"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com "));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn register_validation_reports_each_bad_field() {
        let req = RegisterRequest {
            email: "nope".into(),
            password: "short".into(),
            name: "  ".into(),
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password", "name"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn register_validation_passes_good_input() {
        let req = RegisterRequest {
            email: "demo@healthlog.dev".into(),
            password: "longenough".into(),
            name: "Demo".into(),
        };
        assert!(req.validate().is_ok());
    }
}
