// Domain layer module exports
// Ports (traits) and value types; no infrastructure concerns live here

pub mod errors;
pub mod messaging;
pub mod oauth;
pub mod repositories;
pub mod user;
