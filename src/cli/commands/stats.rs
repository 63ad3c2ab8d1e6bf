use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::period::{month_range, week_range, weeks_in_month};
use crate::core::calculator::summary::{roster_or_seen, summarize_roster};
use crate::db::initialize::open_db;
use crate::db::store::AttendanceStore;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceFilter;
use crate::models::summary::PersonHoursSummary;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{RESET, color_for_progress, color_for_remaining};
use crate::utils::date;
use crate::utils::format_hours;
use crate::utils::formatting::{pad_right, progress_bar, short_name};
use crate::utils::table::{Column, Table};

fn print_row(s: &PersonHoursSummary) {
    let pct = s.weekly_percentage();
    println!(
        "{} {} {}{}{} {} {} {} {}{}{} {}",
        pad_right(&short_name(&s.person_name), 24),
        pad_right(&format_hours(s.weekly_hours), 7),
        color_for_progress(pct),
        pad_right(&format!("{pct:.0}%"), 5),
        RESET,
        progress_bar(pct, 10),
        pad_right(&format_hours(s.monthly_hours), 7),
        pad_right(&format_hours(s.monthly_target_hours), 7),
        color_for_remaining(s.hours_remaining_this_month),
        pad_right(&format_hours(s.hours_remaining_this_month), 9),
        RESET,
        s.progress_emoji(),
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats {
        person,
        space,
        date: date_arg,
        target,
    } = cmd
    {
        let today = date::date_or_today(date_arg.as_deref())?;
        let weekly_target = target.unwrap_or(cfg.weekly_target_hours);
        if !weekly_target.is_finite() || weekly_target <= 0.0 {
            return Err(AppError::Config(format!(
                "weekly target must be a positive number of hours, got {weekly_target}"
            )));
        }

        let mut pool = open_db(&cfg.database)?;
        let records = pool.load_filtered_attendance(&AttendanceFilter {
            space: *space,
            ..Default::default()
        })?;

        let roster = match (person, space) {
            (Some(p), _) => vec![p.clone()],
            (None, Some(s)) => roster_or_seen(cfg.roster(*s), &records),
            (None, None) => roster_or_seen(&cfg.full_roster(), &records),
        };

        if roster.is_empty() {
            warning("Nobody to report on: the roster is empty and no records exist.");
            return Ok(());
        }

        let summaries = summarize_roster(&records, &roster, *space, today, weekly_target);

        let week = week_range(today);
        let month = month_range(today);
        header(format!(
            "Hours - week {} → {} | {} ({} weeks)",
            week.start,
            week.end,
            today.format("%B %Y"),
            weeks_in_month(month.start)
        ));
        if let Some(s) = space {
            println!("Space: {}", s.label());
        }

        let table = Table::new(vec![
            Column::new("Name", 24),
            Column::new("Week", 7),
            Column::new("%", 5),
            Column::new("Progress", 12),
            Column::new("Month", 7),
            Column::new("Target", 7),
            Column::new("Remaining", 9),
        ]);
        print!("{}", table.render());

        for s in &summaries {
            print_row(s);
        }

        let under = summaries.iter().filter(|s| s.is_under_weekly_target).count();
        println!(
            "\nWeekly target {} · {} of {} under target",
            format_hours(weekly_target),
            under,
            summaries.len()
        );
    }
    Ok(())
}
