use serde::{Deserialize, Serialize};
use std::fmt;

const PHONE_MIN_LEN: usize = 9;
const PHONE_MAX_LEN: usize = 15;

/// Phone number value object in international format
///
/// # Invariants
/// - Between 9 and 15 characters long
/// - Starts with the `+` country code marker
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a new PhoneNumber value object
    ///
    /// # Example
    /// ```
    /// use otpauth_api::domain::user::value_objects::PhoneNumber;
    ///
    /// let phone = PhoneNumber::new("+919876543210").expect("valid phone");
    /// assert_eq!(phone.as_str(), "+919876543210");
    /// ```
    pub fn new(phone: impl Into<String>) -> Result<Self, String> {
        let phone = phone.into();
        if phone.len() < PHONE_MIN_LEN || phone.len() > PHONE_MAX_LEN {
            return Err("invalid phone number".to_string());
        }
        if !phone.starts_with('+') {
            return Err("country code is required in phone".to_string());
        }
        Ok(PhoneNumber(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use otpauth_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("test@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        if email.contains('@') && email.len() >= 3 {
            Ok(Email(email))
        } else {
            Err(format!("invalid email: {}", email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_phone() {
        assert!(PhoneNumber::new("+14155550100").is_ok());
    }

    #[test]
    fn phone_boundary_lengths() {
        assert!(PhoneNumber::new("+12345678").is_ok());
        assert!(PhoneNumber::new("+12345678901234").is_ok());
        assert!(PhoneNumber::new("+1234567").is_err());
        assert!(PhoneNumber::new("+123456789012345").is_err());
    }

    #[test]
    fn phone_without_country_code() {
        let err = PhoneNumber::new("9876543210").unwrap_err();
        assert_eq!(err, "country code is required in phone");
    }

    #[test]
    fn phone_empty() {
        assert_eq!(PhoneNumber::new("").unwrap_err(), "invalid phone number");
    }

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_minimum_length() {
        assert!(Email::new("a@b").is_ok());
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_too_short() {
        assert!(Email::new("a@").is_err());
    }

    #[test]
    fn email_display() {
        let email = Email::new("test@example.com").unwrap();
        assert_eq!(format!("{}", email), "test@example.com");
    }
}
