/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const MAGENTA: &str = "\x1b[35m";

/// Weekly progress color, same steps as the progress emoji:
/// 100 → green, ≥60 → yellow, ≥20 → magenta, below → red.
pub fn color_for_progress(percentage: f64) -> &'static str {
    if percentage >= 100.0 {
        GREEN
    } else if percentage >= 60.0 {
        YELLOW
    } else if percentage >= 20.0 {
        MAGENTA
    } else {
        RED
    }
}

/// Remaining hours: orange-ish when something is missing, green otherwise.
pub fn color_for_remaining(hours: f64) -> &'static str {
    if hours > 0.0 { YELLOW } else { GREEN }
}

/// Entries in green, exits in red.
pub fn colorize_event(value: &str, is_entry: bool) -> String {
    let color = if is_entry { GREEN } else { RED };
    format!("{color}{value}{RESET}")
}
