//! Log sanitizing for text that arrives over the air.
//!
//! Mesh text can contain newlines, terminal escapes or be far longer than a
//! log line should be; these helpers keep every log record on one line.
use std::fmt::Write;

const MAX_PREVIEW_CHARS: usize = 300;

/// Escape control characters and cap the length of a string for logging.
///
/// `\n`, `\r`, `\t` and backslash get their usual escapes, any other control
/// character becomes `\xNN`. Anything past 300 characters is replaced by `…`.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW_CHARS) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Lowercase hex of the first `max` bytes, for trace logging of raw frames.
pub fn hex_snippet(data: &[u8], max: usize) -> String {
    let mut out = String::with_capacity(max.min(data.len()) * 2);
    for b in data.iter().take(max) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("hi\n\tthere\x1b"), "hi\\n\\tthere\\x1B");
    }

    #[test]
    fn truncates_long_text() {
        let long = "x".repeat(400);
        let esc = escape_log(&long);
        assert_eq!(esc.chars().count(), MAX_PREVIEW_CHARS + 1);
        assert!(esc.ends_with('…'));
    }

    #[test]
    fn hex_snippet_caps_length() {
        assert_eq!(hex_snippet(&[0x94, 0xc3, 0x00, 0x05], 2), "94c3");
    }
}
