use validator::ValidateEmail;

use crate::error::ApiError;

/// Person types accepted by the people endpoints
pub const PERSON_TYPES: &[&str] = &["employee", "visitor"];

/// Require a non-empty, trimmed name-like field. Returns the trimmed value.
pub fn require_name(value: Option<&str>, field: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(format!("{field} cannot be empty"))),
    }
}

/// Validate a weekday index; 1 = Monday .. 7 = Sunday.
pub fn validate_day_of_week(day: i32) -> Result<(), ApiError> {
    if !(1..=7).contains(&day) {
        return Err(ApiError::Validation(format!(
            "day of week must be between 1 and 7, got {day}"
        )));
    }
    Ok(())
}

/// Validate the person type enum.
pub fn validate_person_type(person_type: &str) -> Result<(), ApiError> {
    let normalized = person_type.to_lowercase();
    if !PERSON_TYPES.contains(&normalized.as_str()) {
        return Err(ApiError::Validation(format!(
            "invalid person type: '{person_type}'. Must be one of: employee, visitor"
        )));
    }
    Ok(())
}

/// Validate email format using the validator crate
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }

    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ApiError::Validation(
            "Password must be at most 128 characters long".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert_eq!(require_name(Some("front door"), "name").unwrap(), "front door");
        assert_eq!(require_name(Some("  padded  "), "name").unwrap(), "padded");
        assert!(require_name(Some(""), "name").is_err());
        assert!(require_name(Some("   "), "name").is_err());
        assert!(require_name(None, "name").is_err());
    }

    #[test]
    fn test_validate_day_of_week() {
        for day in 1..=7 {
            assert!(validate_day_of_week(day).is_ok());
        }
        assert!(validate_day_of_week(0).is_err());
        assert!(validate_day_of_week(8).is_err());
        assert!(validate_day_of_week(-1).is_err());
    }

    #[test]
    fn test_validate_person_type() {
        assert!(validate_person_type("employee").is_ok());
        assert!(validate_person_type("visitor").is_ok());
        assert!(validate_person_type("Employee").is_ok()); // Case insensitive
        assert!(validate_person_type("contractor").is_err());
        assert!(validate_person_type("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("person@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
