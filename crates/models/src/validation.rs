//! Field validators shared by entities and services.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("static regex"));

pub const NAME_MAX: usize = 128;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Spaces are ignored, so `+91 98765 43210` passes.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if is_valid_email(email) { Ok(()) } else { Err(ModelError::Validation("invalid email".into())) }
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if is_valid_phone(phone) { Ok(()) } else { Err(ModelError::Validation("invalid phone number".into())) }
}

/// Trimmed, non-empty, bounded name; returns the trimmed value.
pub fn validate_name(field: &str, value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if v.chars().count() > NAME_MAX {
        return Err(ModelError::Validation(format!("{field} too long (<= {NAME_MAX})")));
    }
    Ok(v.to_string())
}

/// Empty or whitespace-only text becomes `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn phone_pattern_ignores_spaces() {
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("0123456"));
        assert!(!is_valid_phone("+91-98765"));
        assert!(!is_valid_phone("12345678901234567"));
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(validate_name("name", "  Food  ").unwrap(), "Food");
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(NAME_MAX + 1)).is_err());
    }

    #[test]
    fn non_blank_drops_whitespace() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".into()));
        assert_eq!(non_blank(None), None);
    }
}
