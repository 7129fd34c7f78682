// User identity types shared by the OTP and OAuth flows

pub mod value_objects;

pub use value_objects::{Email, PhoneNumber};

/// Identifier assigned by the user store
pub type UserId = i64;

/// Data captured when a user signs up with a phone number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupInfo {
    pub phone: String,
    pub dial_code: Option<String>,
    pub country: Option<String>,
    pub locale: Option<String>,
}

impl SignupInfo {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Default::default()
        }
    }
}

/// User information resolved by an OAuth provider
///
/// Provider-agnostic: `provider_id` holds the provider's own user id
/// (Google `sub`, etc.) and `provider` its name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthUserInfo {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub locale: String,
    pub provider_id: String,
    pub provider: String,
}
