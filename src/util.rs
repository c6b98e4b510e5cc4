//! Small utility helpers used across modules.

/// Split a raw reply on the FIRST `||` into its two answer fields.
/// Anything after a second separator stays part of the second field.
/// Returns `None` when the separator is missing or either field is empty
/// after trimming.
pub fn split_reply(raw: &str) -> Option<(&str, &str)> {
  let (grammar, puzzle) = raw.split_once("||")?;
  let (grammar, puzzle) = (grammar.trim(), puzzle.trim());
  if grammar.is_empty() || puzzle.is_empty() {
    return None;
  }
  Some((grammar, puzzle))
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge free-text payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}
