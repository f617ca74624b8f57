//! Response normalization for chat-completion payloads.
//!
//! Pure domain logic with no I/O. The input is the raw body text returned by a
//! provider, the output is plain conversational text with markdown, LaTeX
//! and escape residue removed.
//!
//! # Pipeline
//!
//! | Step | What | Kept |
//! |------|------|------|
//! | 1 | JSON string escapes (`\"`, `\n`, `\r`, `\t`, `\\`, `\/`) | decoded |
//! | 2 | `$$...$$` and `$...$` math | nothing |
//! | 3 | headers, `**bold**`, `__underline__`, `~~strike~~`, `*italic*`, `_italic_` | inner text |
//! | 4 | fenced code blocks / inline code spans | nothing / inner text |
//! | 5 | one leading list marker per line | rest of line |
//! | 6 | literal `\u2022` / `/u2022` | `•` |
//! | 7 | other literal `\uXXXX` | nothing |
//! | 8 | 3+ newlines | two newlines |
//! | 9 | surrounding whitespace | nothing |
//!
//! [`normalize`] never fails: a payload without the expected path yields
//! [`PARSE_FAILED`], and an internal cleanup failure yields a message
//! starting with [`PARSE_ERROR_PREFIX`].

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Returned when `choices[0].message.content` cannot be located.
pub const PARSE_FAILED: &str = "response parsing failed";

/// Prefix of the message returned when cleanup itself fails.
pub const PARSE_ERROR_PREFIX: &str = "parsing error: ";

const CHOICES_KEY: &str = "\"choices\"";
const MESSAGE_KEY: &str = "\"message\"";
const CONTENT_KEY: &str = "\"content\"";

/// Internal cleanup failure
#[derive(Error, Debug, Clone)]
pub enum NormalizeError {
    #[error("invalid cleanup pattern: {0}")]
    Pattern(String),
}

/// Turn a raw provider payload into display-ready plain text.
pub fn normalize(raw_payload: &str) -> String {
    let Some(content) = extract_content(raw_payload) else {
        return PARSE_FAILED.to_string();
    };

    match try_clean(content) {
        Ok(text) => text,
        Err(e) => format!("{}{}", PARSE_ERROR_PREFIX, e),
    }
}

/// Locate the still-escaped value of `choices[0].message.content`.
///
/// This is a structural scan rather than a full JSON parse so that
/// truncated or slightly malformed bodies still yield their answer.
/// Inside the value a backslash escapes the following character; the
/// value ends at the first unescaped quote.
pub fn extract_content(raw: &str) -> Option<&str> {
    let after_choices = find_after(raw, 0, CHOICES_KEY)?;
    let after_message = find_after(raw, after_choices, MESSAGE_KEY)?;
    let after_content = find_after(raw, after_message, CONTENT_KEY)?;

    let rest = raw[after_content..].trim_start();
    let rest = rest.strip_prefix(':')?.trim_start();
    let value = rest.strip_prefix('"')?;

    // '\\' and '"' are ASCII, so byte indices here are char boundaries.
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(&value[..i]),
            _ => i += 1,
        }
    }
    None
}

/// Apply cleanup steps 1 to 9 to already-extracted content.
///
/// Falls back to a diagnostic string instead of failing.
pub fn clean_response(text: &str) -> String {
    try_clean(text).unwrap_or_else(|e| format!("{}{}", PARSE_ERROR_PREFIX, e))
}

fn find_after(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    haystack[from..]
        .find(needle)
        .map(|pos| from + pos + needle.len())
}

fn try_clean(text: &str) -> Result<String, NormalizeError> {
    let patterns = CLEANUP
        .as_ref()
        .map_err(|e| NormalizeError::Pattern(e.to_string()))?;
    Ok(patterns.apply(&unescape(text)))
}

/// Decode the JSON string escapes the providers emit for plain text.
///
/// Single pass, so an escaped backslash is never re-read as the start of
/// another escape. `\uXXXX` and unknown escapes are kept verbatim.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

static CLEANUP: LazyLock<Result<CleanupPatterns, regex::Error>> =
    LazyLock::new(CleanupPatterns::compile);

struct CleanupPatterns {
    math_block: Regex,
    math_inline: Regex,
    header: Regex,
    bold: Regex,
    underline: Regex,
    strikethrough: Regex,
    italic_star: Regex,
    italic_underscore: Regex,
    fenced_code: Regex,
    inline_code: Regex,
    list_marker: Regex,
    bullet_escape: Regex,
    unicode_escape: Regex,
    blank_lines: Regex,
}

impl CleanupPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            math_block: Regex::new(r"(?s)\$\$.*?\$\$")?,
            math_inline: Regex::new(r"\$[^$\n]*\$")?,
            header: Regex::new(r"(?m)^[ \t]*#+[ \t]+")?,
            bold: Regex::new(r"\*\*(.*?)\*\*")?,
            underline: Regex::new(r"__(.*?)__")?,
            strikethrough: Regex::new(r"~~(.*?)~~")?,
            italic_star: Regex::new(r"\*(.*?)\*")?,
            italic_underscore: Regex::new(r"\b_([^_\n]+)_\b")?,
            fenced_code: Regex::new(r"(?s)```.*?```")?,
            inline_code: Regex::new(r"`([^`\n]*)`")?,
            list_marker: Regex::new(r"(?m)^[ \t]*(?:[*•-]|\d+\.)[ \t]+")?,
            bullet_escape: Regex::new(r"\\u2022|/u2022")?,
            unicode_escape: Regex::new(r"\\u[0-9a-fA-F]{4}")?,
            blank_lines: Regex::new(r"(?:\r?\n){3,}")?,
        })
    }

    fn apply(&self, text: &str) -> String {
        let text = self.math_block.replace_all(text, "");
        let text = self.math_inline.replace_all(&text, "");

        let text = self.header.replace_all(&text, "");
        let text = self.bold.replace_all(&text, "${1}");
        let text = self.underline.replace_all(&text, "${1}");
        let text = self.strikethrough.replace_all(&text, "${1}");
        let text = self.italic_star.replace_all(&text, "${1}");
        let text = self.italic_underscore.replace_all(&text, "${1}");

        let text = self.fenced_code.replace_all(&text, "");
        let text = self.inline_code.replace_all(&text, "${1}");

        let text = self.list_marker.replace_all(&text, "");

        let text = self.bullet_escape.replace_all(&text, "•");
        let text = self.unicode_escape.replace_all(&text, "");

        let text = self.blank_lines.replace_all(&text, "\n\n");

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(content: &str) -> String {
        format!(
            r#"{{"id":"chatcmpl-1","object":"chat.completion","choices":[{{"index":0,"message":{{"role":"assistant","content":"{}"}},"finish_reason":"stop"}}]}}"#,
            content
        )
    }

    #[test]
    fn test_bold_stripped_and_newlines_collapsed() {
        let raw = r#"{"choices":[{"message":{"content":"**Hi** there\n\n\n\nBob"}}]}"#;
        assert_eq!(normalize(raw), "Hi there\n\nBob");
    }

    #[test]
    fn test_missing_choices_returns_diagnostic() {
        assert_eq!(normalize(r#"{"error":{"message":"bad key"}}"#), PARSE_FAILED);
        assert_eq!(normalize(""), PARSE_FAILED);
        assert_eq!(normalize("not json at all"), PARSE_FAILED);
    }

    #[test]
    fn test_null_content_returns_diagnostic() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(normalize(raw), PARSE_FAILED);
    }

    #[test]
    fn test_unterminated_content_returns_diagnostic() {
        let raw = r#"{"choices":[{"message":{"content":"cut off here"#;
        assert_eq!(normalize(raw), PARSE_FAILED);
    }

    #[test]
    fn test_escaped_quotes_do_not_terminate() {
        let raw = payload(r#"She said \"hello\" and left"#);
        assert_eq!(extract_content(&raw), Some(r#"She said \"hello\" and left"#));
        assert_eq!(normalize(&raw), r#"She said "hello" and left"#);
    }

    #[test]
    fn test_escaped_backslash_before_quote_terminates() {
        // content is `C:\` followed by the closing quote
        let raw = payload(r"C:\\");
        assert_eq!(extract_content(&raw), Some(r"C:\\"));
        assert_eq!(normalize(&raw), r"C:\");
    }

    #[test]
    fn test_whitespace_around_colon() {
        let raw = "{\"choices\": [ {\"message\" : {\"content\" :  \"spaced\" } } ] }";
        assert_eq!(normalize(raw), "spaced");
    }

    #[test]
    fn test_unescape_is_single_pass() {
        assert_eq!(unescape(r"a\\nb"), r"a\nb");
        assert_eq!(unescape(r"line\nnext\ttab\/slash"), "line\nnext\ttab/slash");
        assert_eq!(unescape(r"keep \u00e9"), r"keep \u00e9");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_latex_removed_with_contents() {
        assert_eq!(
            clean_response(r"Energy $$E = mc^2$$ and $x$ done"),
            "Energy  and  done"
        );
    }

    #[test]
    fn test_markdown_emphasis_keeps_inner_text() {
        assert_eq!(
            clean_response("## Title\nSome **bold**, __under__, ~~gone~~, *it* and _em_."),
            "Title\nSome bold, under, gone, it and em."
        );
    }

    #[test]
    fn test_snake_case_survives() {
        assert_eq!(clean_response("call my_func_name now"), "call my_func_name now");
    }

    #[test]
    fn test_code_blocks() {
        assert_eq!(
            clean_response(r"Run `cargo test`:\n```rust\nfn main() {}\n```\nDone"),
            "Run cargo test:\n\nDone"
        );
    }

    #[test]
    fn test_list_markers_stripped_per_line() {
        assert_eq!(
            clean_response(r"Items:\n* one\n- two\n  3. three\n• four"),
            "Items:\none\ntwo\nthree\nfour"
        );
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(clean_response(r"\u2022 first /u2022 second"), "• first • second");
        assert_eq!(clean_response(r"caf\u00e9 time"), "caf time");
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(clean_response(r"\n\n  padded  \n"), "padded");
    }

    #[test]
    fn test_only_first_choice_content_is_used() {
        let raw = r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(normalize(raw), "first");
    }

    #[test]
    fn test_multibyte_content() {
        let raw = payload("こんにちは **世界**");
        assert_eq!(normalize(&raw), "こんにちは 世界");
    }
}
