//! Form validation for user create/edit input.
//!
//! Validation is whole-form: every field is checked and every violation is
//! reported in one pass, so the caller can surface all problems at once
//! instead of fixing them one prompt at a time.

use crate::model::{Address, User, UserPatch};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8,}$").expect("phone regex"));

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Editable fields of a user, as captured from the form prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub suite: String,
    pub street: String,
    /// Optional, no format constraint.
    pub zipcode: Option<String>,
}

impl UserForm {
    /// Capture the editable fields of an existing record, for edit prompts.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            city: user.address.city.clone(),
            suite: user.address.suite.clone(),
            street: user.address.street.clone(),
            zipcode: if user.address.zipcode.is_empty() {
                None
            } else {
                Some(user.address.zipcode.clone())
            },
        }
    }

    /// Validate all fields, returning either the normalized (trimmed) form
    /// or every violation found.
    pub fn validate(&self) -> Result<UserForm, Vec<FieldError>> {
        let normalized = UserForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            city: self.city.trim().to_string(),
            suite: self.suite.trim().to_string(),
            street: self.street.trim().to_string(),
            zipcode: self.zipcode.as_ref().map(|z| z.trim().to_string()),
        };

        let mut errors = Vec::new();
        if normalized.name.chars().count() < 2 {
            errors.push(FieldError {
                field: "name".to_string(),
                message: "Name must be at least 2 characters".to_string(),
            });
        }
        if !EMAIL_RE.is_match(&normalized.email) {
            errors.push(FieldError {
                field: "email".to_string(),
                message: "Invalid email address".to_string(),
            });
        }
        if !PHONE_RE.is_match(&normalized.phone) {
            errors.push(FieldError {
                field: "phone".to_string(),
                message: "Phone number must be at least 8 digits".to_string(),
            });
        }
        if normalized.city.chars().count() < 2 {
            errors.push(FieldError {
                field: "city".to_string(),
                message: "City must be at least 2 characters".to_string(),
            });
        }
        if normalized.suite.chars().count() < 2 {
            errors.push(FieldError {
                field: "suite".to_string(),
                message: "Suite must be at least 2 characters".to_string(),
            });
        }
        if normalized.street.chars().count() < 2 {
            errors.push(FieldError {
                field: "street".to_string(),
                message: "Street name must be at least 2 characters".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            suite: self.suite.clone(),
            city: self.city.clone(),
            zipcode: self.zipcode.clone().unwrap_or_default(),
        }
    }

    /// Build a store candidate from a validated form. The id is a
    /// placeholder; the store assigns the real one.
    pub fn into_candidate(self) -> User {
        User {
            id: 0,
            name: self.name.clone(),
            username: None,
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: None,
            address: self.address(),
            company: None,
        }
    }

    /// Build an update patch from a validated form. Only the form-editable
    /// fields are patched; username, website, and company ride through the
    /// merge untouched.
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            address: Some(self.address()),
            ..UserPatch::default()
        }
    }
}
