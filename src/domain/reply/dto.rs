use super::model::ChatReply;
use serde::{Deserialize, Serialize};

/// Bot API method bodies the bot emits.
///
/// Serialized with a `method` tag so the same body works as a webhook
/// response and as a direct API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum OutboundMethod {
    #[serde(rename = "sendMessage")]
    SendMessage { chat_id: i64, text: String },
    #[serde(rename = "sendVoice")]
    SendVoice { chat_id: i64, voice: String },
    #[serde(rename = "answerInlineQuery")]
    AnswerInlineQuery {
        inline_query_id: String,
        results: Vec<serde_json::Value>,
    },
}

impl OutboundMethod {
    /// Inline queries are acknowledged with an empty result set
    pub fn empty_inline_answer(inline_query_id: impl Into<String>) -> Self {
        OutboundMethod::AnswerInlineQuery {
            inline_query_id: inline_query_id.into(),
            results: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutboundMethod::SendMessage { .. } => "sendMessage",
            OutboundMethod::SendVoice { .. } => "sendVoice",
            OutboundMethod::AnswerInlineQuery { .. } => "answerInlineQuery",
        }
    }
}

impl From<&ChatReply> for OutboundMethod {
    fn from(reply: &ChatReply) -> Self {
        match reply {
            ChatReply::Text { chat_id, text } => OutboundMethod::SendMessage {
                chat_id: *chat_id,
                text: text.clone(),
            },
            ChatReply::Voice { chat_id, asset_uri } => OutboundMethod::SendVoice {
                chat_id: *chat_id,
                voice: asset_uri.clone(),
            },
        }
    }
}
