// Authentication core: OTP flow, token minting and identity orchestration

pub mod code;
pub mod jwt;
pub mod otp;
pub mod service;

pub use jwt::{Audience, Claims, TokenError, TokenService};
pub use otp::{OtpService, OtpStatus};
pub use service::{AuthService, TokenPair};
