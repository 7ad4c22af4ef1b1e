use crate::domain::reply::{ChatReply, OutboundMethod, ReplySender};
use async_trait::async_trait;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot API client used for replies that cannot ride on a webhook response
pub struct TelegramClient {
    bot_token: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: String, api_base_url: String) -> Self {
        Self {
            bot_token,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// `{base}/bot{token}/{method}`
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }

    pub async fn call(&self, method: &OutboundMethod) -> Result<(), String> {
        let response = self
            .http_client
            .post(self.method_url(method.name()))
            .json(method)
            .send()
            .await
            .map_err(|e| format!("Bot API {} request failed: {}", method.name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!(
                "Bot API {} failed with {}: {}",
                method.name(),
                status,
                error_text
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl ReplySender for TelegramClient {
    async fn send(&self, reply: &ChatReply) -> Result<(), String> {
        let method = OutboundMethod::from(reply);

        tracing::info!(
            chat_id = reply.chat_id(),
            method = method.name(),
            "Sending reply through the Bot API"
        );

        self.call(&method).await
    }
}
