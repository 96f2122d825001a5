use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Lower-cases and trims an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.len() > 254 || !email_regex().is_match(email) {
        return Err(AppError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("nimal@leoclub.lk").is_ok());
        assert!(validate_email("a.b+c@example.co.uk").is_ok());
        assert!(validate_email("nimal@leoclub").is_err());
        assert!(validate_email("nimal leoclub.lk").is_err());
        assert!(validate_email("@leoclub.lk").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Nimal@LeoClub.lk "), "nimal@leoclub.lk");
    }
}
