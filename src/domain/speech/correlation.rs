//! Chat correlation for asynchronous synthesis jobs.
//!
//! A job's output lands in storage as `<chatId>/<suffix>.<ext>` and the chat
//! is recovered from the first path segment. This module is the only place
//! that knows the layout.

use super::error::SpeechError;
use super::model::ChatId;

const SEGMENT_SEPARATOR: char = '/';

/// Key prefix handed to the synthesis service for a chat's job
pub fn job_key_prefix(chat_id: ChatId) -> String {
    format!("{}{}", chat_id, SEGMENT_SEPARATOR)
}

/// Recover the chat a stored object belongs to
pub fn chat_id_from_key(key: &str) -> Result<ChatId, SpeechError> {
    let (segment, _) = key
        .split_once(SEGMENT_SEPARATOR)
        .ok_or_else(|| SpeechError::KeyFormat(key.to_string()))?;

    segment
        .parse::<ChatId>()
        .map_err(|_| SpeechError::KeyFormat(key.to_string()))
}

/// Extension of the key's last segment, if any
pub fn key_extension(key: &str) -> Option<&str> {
    let file_name = key.rsplit(SEGMENT_SEPARATOR).next().unwrap_or(key);
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| !extension.is_empty())
}

/// Same key with the final extension replaced (or appended when missing)
pub fn retarget_key(key: &str, extension: &str) -> String {
    let (dir, file_name) = match key.rsplit_once(SEGMENT_SEPARATOR) {
        Some((dir, file_name)) => (Some(dir), file_name),
        None => (None, key),
    };

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    match dir {
        Some(dir) => format!("{}{}{}.{}", dir, SEGMENT_SEPARATOR, stem, extension),
        None => format!("{}.{}", stem, extension),
    }
}
