use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ListingDraft;

pub const MAX_COVER_LETTER_CHARS: usize = 5000;
pub const MIN_PASSWORD_CHARS: usize = 6;

pub const RESUME_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const AVATAR_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/gif"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects field failures so a form reports all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, format!("{field} is required"));
        }
        self
    }

    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(self.errors))
        }
    }
}

/// Required fields, salary ordering and a deadline no earlier than `today`.
pub fn validate_listing_draft(draft: &ListingDraft, today: NaiveDate) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.require("title", &draft.title)
        .require("company", &draft.company)
        .require("location", &draft.location)
        .require("category", &draft.category)
        .require("description", &draft.description)
        .require("requirements", &draft.requirements)
        .require("salary_currency", &draft.salary_currency)
        .check(
            draft.salary_min >= 0,
            "salary_min",
            "salary_min must not be negative",
        )
        .check(
            draft.salary_min <= draft.salary_max,
            "salary_max",
            format!(
                "salary_max ({}) must be at least salary_min ({})",
                draft.salary_max, draft.salary_min
            ),
        )
        .check(
            draft.deadline >= today,
            "deadline",
            format!("deadline {} is in the past", draft.deadline),
        );
    v.finish()
}

pub fn validate_applicant(name: &str, email: &str, cover_letter: Option<&str>) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.require("applicant_name", name)
        .check(is_plausible_email(email), "applicant_email", "a valid email is required");
    if let Some(letter) = cover_letter {
        v.check(
            letter.chars().count() <= MAX_COVER_LETTER_CHARS,
            "cover_letter",
            format!("cover_letter must be at most {MAX_COVER_LETTER_CHARS} characters"),
        );
    }
    v.finish()
}

pub fn validate_sign_up(email: &str, password: &str, display_name: &str) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.require("display_name", display_name)
        .check(is_plausible_email(email), "email", "a valid email is required")
        .check(
            password.chars().count() >= MIN_PASSWORD_CHARS,
            "password",
            format!("password must be at least {MIN_PASSWORD_CHARS} characters"),
        );
    v.finish()
}

/// Checks an uploaded file against an allowlist of content types and a size cap.
pub fn validate_upload(
    field: &str,
    content_type: &str,
    size: usize,
    allowed: &[&str],
    max_bytes: usize,
) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.check(size > 0, field, format!("{field} is empty"))
        .check(
            size <= max_bytes,
            field,
            format!("{field} is {size} bytes, the limit is {max_bytes}"),
        )
        .check(
            allowed.contains(&content_type),
            field,
            format!("{field} has unsupported type '{content_type}'"),
        );
    v.finish()
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
