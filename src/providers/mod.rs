//! Transport implementations for the chat-completion wire contract

pub mod groq;

use async_trait::async_trait;

// Re-export for convenience
pub use groq::{RestTransport, SseTransport};

/// One chat-completion transport.
/// A fetch issues exactly one outbound call; retries stay with the
/// caller.
#[async_trait]
pub trait CompletionTransport: Send + Sync
{   /// Transport name used in logs
    fn name(&self) -> &'static str;

    /// Submit the request and return its chunks in arrival order.
    async fn fetch(
      &self
    , request: &crate::request::CompletionRequest
    , api_key: &str
    ) -> Result<
        Vec<crate::request::CompletionChunk>,
        crate::error::Error
      >;
}
