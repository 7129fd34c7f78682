use async_trait::async_trait;

use crate::domain::errors::BoxError;
use crate::domain::messaging::MessageSender;

/// Development sender that records dispatches in the log instead of an SMS gateway
///
/// Only the message length is logged, at debug level; the body carries the code.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessageSender;

#[async_trait]
impl MessageSender for LogMessageSender {
    async fn send(&self, _phone: &str, message: &str) -> Result<(), BoxError> {
        tracing::debug!(length = message.len(), "outbound message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_always_succeeds() {
        assert!(LogMessageSender
            .send("+14155550100", "Your OTP is 123456")
            .await
            .is_ok());
    }
}
