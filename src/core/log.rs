use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use unicode_width::UnicodeWidthStr;

const OP_MAX_WIDTH: usize = 40;
const MESSAGE_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    match regex::Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(_) => s.to_string(),
    }
}

/// ANSI colour for each audited operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "attend" => Colour::Green,
        "task_add" => Colour::Cyan,
        "task_edit" => Colour::Yellow,
        "task_done" | "task_undo" => Colour::Blue,
        "export" => Colour::Fixed(75),
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

/// Timestamps are RFC 3339 for application rows, SQLite `datetime('now')`
/// for migration rows; both are shown as-is when they do not parse.
fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn op_target(row: &LogRow) -> String {
    if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    }
}

/// Render the log rows as aligned, coloured lines. Long messages wrap under
/// the message column.
pub fn render_log(rows: &[LogRow]) -> Vec<String> {
    let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
    let date_w = rows
        .iter()
        .map(|r| format_date(&r.date).len())
        .max()
        .unwrap_or(10);
    let op_w = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(op_target(r).as_str()))
        .max()
        .unwrap_or(10)
        .min(OP_MAX_WIDTH);

    let mut out = Vec::new();

    for row in rows {
        let color = color_for_operation(&row.operation);

        let mut visible = op_target(row);
        if UnicodeWidthStr::width(visible.as_str()) > OP_MAX_WIDTH {
            visible = visible.chars().take(OP_MAX_WIDTH - 3).collect::<String>() + "...";
        }

        // only the operation word is coloured
        let colored = match visible.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(visible.as_str()).to_string(),
        };
        let padding = " ".repeat(op_w.saturating_sub(UnicodeWidthStr::width(
            strip_ansi(&colored).as_str(),
        )));

        let prefix = format!(
            "{:>id_w$}: {:<date_w$} | {}{} => ",
            row.id,
            format_date(&row.date),
            colored,
            padding,
        );
        let indent = " ".repeat(UnicodeWidthStr::width(strip_ansi(&prefix).as_str()));

        let wrapped = textwrap::wrap(&row.message, MESSAGE_WIDTH);
        let mut lines = wrapped.iter();
        let first = lines.next().map(|l| l.to_string()).unwrap_or_default();
        out.push(format!("{prefix}{first}"));
        for l in lines {
            out.push(format!("{indent}{l}"));
        }
    }

    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let rows = load_log(&pool.conn)?;

        if rows.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        println!("📜 Internal log:\n");
        for line in render_log(&rows) {
            println!("{line}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, op: &str, target: &str, message: &str) -> LogRow {
        LogRow {
            id,
            date: "2026-10-19T08:00:00+00:00".into(),
            operation: op.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    #[test]
    fn lines_align_and_long_messages_wrap() {
        let long = "word ".repeat(30);
        let rows = vec![
            row(1, "init", "", "Database initialized"),
            row(12, "attend", "ISABELA OBREGON", &long),
        ];
        let lines: Vec<String> = render_log(&rows).iter().map(|l| strip_ansi(l)).collect();

        assert!(lines[0].starts_with(" 1: 2026-10-19 08:00:00 | init"));
        assert!(lines[0].ends_with("=> Database initialized"));
        assert!(lines[1].contains("attend (ISABELA OBREGON) => word"));
        assert!(lines.len() > 2);

        let col = lines[1].find("=> ").unwrap() + 3;
        assert!(lines[2].starts_with(&" ".repeat(col)));
    }

    #[test]
    fn unparsable_dates_are_kept() {
        assert_eq!(format_date("2026-10-19 08:00:00"), "2026-10-19 08:00:00");
    }
}
