//! OTP Auth API Library
//!
//! Phone-number OTP login, OAuth login and JWT access/refresh token issuance.
//! The core (`auth`) talks to its collaborators only through the ports in
//! `domain`; `infrastructure` provides the concrete adapters and `api` the
//! HTTP surface.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
