use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::{
        reply::OutboundMethod,
        speech::{DispatcherApi, DispatcherService},
    },
    error::{AppError, AppResult},
};

/// Inbound webhook update, only the fields the bot reads
#[derive(Debug, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    #[serde(default)]
    pub query: String,
}

pub struct WebhookController {
    dispatcher: Arc<DispatcherService>,
}

impl WebhookController {
    pub fn new(dispatcher: Arc<DispatcherService>) -> Self {
        Self { dispatcher }
    }

    /// POST /webhook - Handle one chat platform update
    ///
    /// A parsed update is always acknowledged with 200; pipeline failures
    /// travel in-band as a `sendMessage` reply. Only a payload that cannot be
    /// parsed is rejected.
    pub async fn handle_update(
        State(controller): State<Arc<WebhookController>>,
        body: Bytes,
    ) -> AppResult<Response> {
        let update: Update = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("malformed update: {}", e)))?;

        if let Some(inline_query) = update.inline_query {
            tracing::debug!(
                update_id = update.update_id,
                inline_query_id = %inline_query.id,
                "Answering inline query with no results"
            );
            return Ok(Json(OutboundMethod::empty_inline_answer(inline_query.id)).into_response());
        }

        let Some(message) = update.message else {
            return Ok(StatusCode::OK.into_response());
        };

        let Some(text) = message.text.as_deref() else {
            return Ok(StatusCode::OK.into_response());
        };

        let outcome = controller.dispatcher.dispatch(message.chat.id, text).await;

        match outcome.into_reply() {
            Some(reply) => Ok(Json(OutboundMethod::from(&reply)).into_response()),
            None => Ok(StatusCode::OK.into_response()),
        }
    }
}
