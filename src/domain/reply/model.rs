use crate::domain::speech::{ChatId, SpeechError};

/// Terminal output of the pipeline, exactly one per handled request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Text { chat_id: ChatId, text: String },
    Voice { chat_id: ChatId, asset_uri: String },
}

impl ChatReply {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        ChatReply::Text {
            chat_id,
            text: text.into(),
        }
    }

    pub fn voice(chat_id: ChatId, asset_uri: impl Into<String>) -> Self {
        ChatReply::Voice {
            chat_id,
            asset_uri: asset_uri.into(),
        }
    }

    /// Report a pipeline failure to the user
    pub fn error(chat_id: ChatId, err: &SpeechError) -> Self {
        ChatReply::text(chat_id, err.to_string())
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            ChatReply::Text { chat_id, .. } | ChatReply::Voice { chat_id, .. } => *chat_id,
        }
    }

    pub fn is_voice(&self) -> bool {
        matches!(self, ChatReply::Voice { .. })
    }
}
