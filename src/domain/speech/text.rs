/// Characters accepted between the mention and the text to speak
const SEPARATORS: &[char] = &[' ', '\t', '\n', ':', ','];

/// Strip the bot mention and truncate what is left to `limit` characters.
///
/// Returns `None` when the message is not addressed to the bot, i.e. it does
/// not start with `mention` as a whole token (`@Bot` matches `@Bot hi` but
/// not `@Bother hi`). At most one separator after the mention is removed.
pub fn normalize_text(text: &str, mention: &str, limit: usize) -> Option<String> {
    if mention.is_empty() {
        return None;
    }

    let rest = text.strip_prefix(mention)?;

    if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    let rest = rest.strip_prefix(SEPARATORS).unwrap_or(rest);

    Some(truncate_chars(rest, limit))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
