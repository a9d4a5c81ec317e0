//! Input validation for API requests.
//!
//! Validators run at the handler boundary, before any store write, so a
//! rejected request never partially applies a mutation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();

    /// Regex for validating phone numbers (digits, optional leading +)
    static ref PHONE_REGEX: Regex = Regex::new(
        r"^\+?[0-9]{7,15}$"
    ).unwrap();
}

/// Validate a display name (staff or client)
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.len() < 3 {
        return Err("Please provide a valid name (min 3 characters)".to_string());
    }
    if trimmed.len() > 50 {
        return Err("Name must be between 3 and 50 characters".to_string());
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Please provide email".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Please provide a valid email".to_string());
    }
    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Please provide phone number".to_string());
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err("Please provide a valid phone number".to_string());
    }
    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }
    Ok(())
}

/// Validate a value against a closed set of allowed strings
pub fn validate_one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), String> {
    if !allowed.contains(&value) {
        return Err(format!(
            "Invalid {}. Must be one of: {}",
            field,
            allowed.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ana").is_ok());
        assert!(validate_name("  Ana  ").is_ok()); // trimmed before length check
        assert!(validate_name("A proper full name").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("ab").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last@sub.example.co").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("5550100").is_ok());
        assert!(validate_phone("+8801712345678").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err()); // too short
        assert!(validate_phone("phone").is_err());
        assert!(validate_phone("555-0100").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("single", &["bundled", "single"], "type").is_ok());
        let err = validate_one_of("triple", &["bundled", "single"], "type").unwrap_err();
        assert!(err.contains("Invalid type"));
        assert!(err.contains("bundled, single"));
    }
}
