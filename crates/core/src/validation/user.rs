//! Rules for user records created on first login.

use std::sync::LazyLock;

use regex::Regex;

use super::char_len;
use crate::identity::UserProfile;

pub const MAX_NAME_LENGTH: usize = 50;

/// Loose email shape: something, an `@`, something, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid regex"));

/// Whether `value` looks like an email address.
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Validate a user profile, returning every violated rule in field order.
///
/// A blank username or email is also not email-shaped and reports both.
pub fn validate_user(user: &UserProfile) -> Vec<String> {
    let mut errors = Vec::new();

    if user.username.trim().is_empty() {
        errors.push("Username is required. Ensure you add a valid username".to_string());
    }
    if !is_email_shaped(&user.username) {
        errors.push("Username must be a valid email address.".to_string());
    }

    if user.email.trim().is_empty() {
        errors.push("Email is required. Ensure you add a valid email".to_string());
    }
    if !is_email_shaped(&user.email) {
        errors.push("Invalid email format.".to_string());
    }

    if user.first_name.trim().is_empty() {
        errors.push("First name is required. Ensure you add a valid firstname".to_string());
    } else if char_len(&user.first_name) > MAX_NAME_LENGTH {
        errors.push(format!(
            "First name must not exceed {MAX_NAME_LENGTH} characters."
        ));
    }

    if user.last_name.trim().is_empty() {
        errors.push("Last name is required. Ensure you add a valid lastname".to_string());
    } else if char_len(&user.last_name) > MAX_NAME_LENGTH {
        errors.push(format!(
            "Last name must not exceed {MAX_NAME_LENGTH} characters."
        ));
    }

    errors
}
