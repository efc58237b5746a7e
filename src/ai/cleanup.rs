//! Completion cleanup
//!
//! Models are told to reply with bare code but often wrap it in a markdown
//! fence anyway. Stripping is conservative: only a fence that opens the
//! reply (with an optional language tag) and the fence that closes it are
//! removed together; fences inside the code are left alone.

/// Strip a leading/trailing markdown code fence and trim whitespace.
///
/// Text without fences is returned trimmed and otherwise unchanged.
pub fn strip_code_fences(raw: &str) -> String {
    let mut body = raw.trim();
    let mut opened = false;

    if let Some(rest) = body.strip_prefix("```") {
        match rest.find('\n') {
            Some(newline) if is_fence_tag(&rest[..newline]) => {
                body = &rest[newline + 1..];
                opened = true;
            }
            None if is_fence_tag(rest) => {
                body = "";
                opened = true;
            }
            _ => {}
        }
    }

    // A closing fence only pairs with a stripped opening one
    if opened && let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim().to_string()
}

/// Info string after an opening fence, e.g. `js`, `typescript`, `c++`
fn is_fence_tag(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '.' | '#'))
}
