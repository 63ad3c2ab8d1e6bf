//! Formatting utilities used for CLI and export outputs.

use crate::models::space::Space;
use unicode_width::UnicodeWidthStr;

/// Pads by display width, so accented names line up in tables.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Truncates to `width` display columns, appending "…" when cut.
pub fn truncate(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw + 1 > width {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push('…');
    out
}

/// First two words of a full name ("ANA MARIA LOPEZ" → "ANA MARIA").
pub fn short_name(full: &str) -> String {
    full.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Textual description and ANSI color for a space.
pub fn describe_space(space: Space) -> (String, &'static str) {
    match space {
        Space::Office => ("Office".into(), "\x1b[34m"),
        Space::Auditorium => ("Auditorium".into(), "\x1b[35m"),
    }
}

/// Fixed-width text progress bar: `[#####.....]`.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad_right("CASTAÑEDA", 11), "CASTAÑEDA  ");
        assert_eq!(pad_right("LONGER THAN", 4), "LONGER THAN");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("ABCDEFGHIJ", 5), "ABCD…");
        assert_eq!(truncate("ABC", 5), "ABC");
    }

    #[test]
    fn short_name_takes_two_words() {
        assert_eq!(short_name("JUAN DAVID TABARES"), "JUAN DAVID");
        assert_eq!(short_name("ISABELA"), "ISABELA");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(50.0, 10), "[#####.....]");
        assert_eq!(progress_bar(150.0, 4), "[####]");
        assert_eq!(progress_bar(0.0, 4), "[....]");
    }
}
