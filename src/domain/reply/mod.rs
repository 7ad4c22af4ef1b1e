pub mod dto;
pub mod model;

use async_trait::async_trait;

pub use dto::OutboundMethod;
pub use model::ChatReply;

/// Delivers replies to the chat platform.
///
/// Delivery is fire-and-forget for the pipeline: callers log a failure but
/// never retry or report it to the user.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, reply: &ChatReply) -> Result<(), String>;
}
