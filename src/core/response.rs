//! Reply splitting for Discord message limits
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Reply splitting only; embed helpers removed
//! - 1.0.0: Initial chunking utilities

/// Discord message content limit (bytes)
pub const MESSAGE_LIMIT: usize = 2000;

/// Split a reply into messages that each fit `limit` bytes.
///
/// Breaks on line boundaries where possible and never inside a UTF-8 character.
pub fn split_reply(text: &str, limit: usize) -> Vec<String> {
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        // +1 for the newline that joins it to `current`
        let needed = if current.is_empty() { line.len() } else { line.len() + 1 };

        if current.len() + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }

        if line.len() <= limit {
            current.push_str(line);
        } else {
            let mut pieces = split_oversized_line(line, limit);
            if let Some(last) = pieces.pop() {
                parts.extend(pieces);
                current = last;
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn split_oversized_line(line: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in line.chars() {
        if piece.len() + ch.len_utf8() > limit && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
        }
        piece.push(ch);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Split a reply for a regular chat message
pub fn split_for_message(text: &str) -> Vec<String> {
    split_reply(text, MESSAGE_LIMIT)
}
