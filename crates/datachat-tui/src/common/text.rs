//! Text utilities for TUI rendering.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds max_width (unicode-aware).
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Removes ANSI escapes and expands tabs so widths stay predictable.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains('\x1b') || s.contains('\t') || s.contains('\r') {
        Cow::Owned(s.replace('\x1b', "").replace('\t', "    ").replace('\r', ""))
    } else {
        Cow::Borrowed(s)
    }
}

/// Wraps text to `width` display columns.
///
/// Explicit newlines are kept. Words longer than the width are split by
/// character. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw_line in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in raw_line.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!line.is_empty());

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        out.push(line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_short() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_with_ellipsis_long() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
    }

    #[test]
    fn test_sanitize_expands_tabs() {
        assert_eq!(sanitize_for_display("a\tb"), "a    b");
        assert!(matches!(sanitize_for_display("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_wrap_text_on_words() {
        assert_eq!(wrap_text("the quick brown fox", 10), ["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_text_keeps_newlines_and_splits_long_words() {
        assert_eq!(wrap_text("ab\nabcdefg", 3), ["ab", "abc", "def", "g"]);
    }

    #[test]
    fn test_wrap_text_empty_is_one_line() {
        assert_eq!(wrap_text("", 5), [""]);
    }
}
