//! Client-side validation rules for the contact form

use crate::form::model::{FormData, FormErrors, FormField};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum message length after trimming, in characters
pub const MIN_MESSAGE_LENGTH: usize = 10;

pub const FULL_NAME_REQUIRED: &str = "Full name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters long";

/// Check an address has the shape `local@domain.tld`.
///
/// One `@`, no whitespace anywhere, and a dot in the domain with
/// something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
    });

    EMAIL_REGEX.is_match(email)
}

/// Compute the full error set for the given form data
pub fn validate_form(data: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if data.full_name.trim().is_empty() {
        errors.insert(FormField::FullName, FULL_NAME_REQUIRED);
    }

    if data.email.trim().is_empty() {
        errors.insert(FormField::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(&data.email) {
        errors.insert(FormField::Email, EMAIL_INVALID);
    }

    let message = data.message.trim();
    if message.is_empty() {
        errors.insert(FormField::Message, MESSAGE_REQUIRED);
    } else if message.chars().count() < MIN_MESSAGE_LENGTH {
        errors.insert(FormField::Message, MESSAGE_TOO_SHORT);
    }

    errors
}
