use async_trait::async_trait;

use super::errors::BoxError;

/// Outbound message dispatch (SMS gateway or equivalent)
///
/// Dispatch is synchronous from the caller's point of view: when `send`
/// returns `Ok` the gateway has accepted the message.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), BoxError>;
}
