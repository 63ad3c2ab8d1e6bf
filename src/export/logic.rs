// src/export/logic.rs

use crate::config::Config;
use crate::core::calculator::summary::{roster_or_seen, summarize_roster};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{AttendanceStore, TaskStore};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{AttendanceExport, SummaryExport, TaskExport};
use crate::export::{ExportFormat, ExportKind};
use crate::models::attendance::AttendanceFilter;
use crate::models::space::Space;
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Parameters of one export run.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub format: ExportFormat,
    pub file: String,
    /// `None` / `"all"` or any period expression (`YYYY`, `YYYY-MM`,
    /// `YYYY-MM-DD`, `START:END`)
    pub period: Option<String>,
    pub space: Option<Space>,
    pub force: bool,
}

/// High-level export logic.
pub struct ExportLogic;

fn write_items<T: Serialize>(items: &[T], format: ExportFormat, path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(items, path),
        ExportFormat::Json => export_json(items, path),
    }
}

impl ExportLogic {
    /// Run the export and return the number of rows written.
    ///
    /// Summaries are computed for the week and month of the period end
    /// (or `today` when no period is given).
    pub fn export(
        pool: &mut DbPool,
        cfg: &Config,
        req: &ExportRequest,
        today: NaiveDate,
    ) -> AppResult<usize> {
        let path = Path::new(&req.file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {}",
                req.file
            )));
        }

        ensure_writable(path, req.force)?;

        let bounds: Option<(NaiveDate, NaiveDate)> = match &req.period {
            None => None,
            Some(p) if p.eq_ignore_ascii_case("all") => None,
            Some(p) => Some(parse_period(p)?),
        };

        let written = match req.kind {
            ExportKind::Attendance => {
                let filter = AttendanceFilter {
                    space: req.space,
                    from: bounds.map(|b| b.0),
                    to: bounds.map(|b| b.1),
                    ..Default::default()
                };
                let mut rows: Vec<AttendanceExport> = pool
                    .load_filtered_attendance(&filter)?
                    .iter()
                    .map(AttendanceExport::from)
                    .collect();
                // chronological for reports
                rows.sort_by(|a, b| (&a.date, &a.time, a.id).cmp(&(&b.date, &b.time, b.id)));

                if rows.is_empty() {
                    warning("No attendance records found for the selected period.");
                    return Ok(0);
                }
                write_items(&rows, req.format, path)?;
                rows.len()
            }

            ExportKind::Summary => {
                let reference = bounds.map(|b| b.1).unwrap_or(today);
                let filter = AttendanceFilter {
                    space: req.space,
                    ..Default::default()
                };
                let records = pool.load_filtered_attendance(&filter)?;

                let roster = match req.space {
                    Some(s) => roster_or_seen(cfg.roster(s), &records),
                    None => roster_or_seen(&cfg.full_roster(), &records),
                };

                let rows: Vec<SummaryExport> = summarize_roster(
                    &records,
                    &roster,
                    req.space,
                    reference,
                    cfg.weekly_target_hours,
                )
                .iter()
                .map(SummaryExport::from)
                .collect();

                if rows.is_empty() {
                    warning("Nobody to summarize: the roster is empty.");
                    return Ok(0);
                }
                write_items(&rows, req.format, path)?;
                rows.len()
            }

            ExportKind::Tasks => {
                let tasks = match bounds {
                    Some((from, to)) => pool.load_tasks_between(from, to)?,
                    None => pool.load_all_tasks()?,
                };
                let rows: Vec<TaskExport> =
                    tasks.iter().map(|t| TaskExport::from_task(t, cfg)).collect();

                if rows.is_empty() {
                    warning("No tasks found for the selected period.");
                    return Ok(0);
                }
                write_items(&rows, req.format, path)?;
                rows.len()
            }
        };

        ttlog(
            &pool.conn,
            "export",
            req.kind.as_str(),
            &format!(
                "{} rows exported as {} to {}",
                written,
                req.format.as_str(),
                path.display()
            ),
        )?;

        Ok(written)
    }
}
