use serde::Serialize;

/// Worked-hours report for one person over the current week and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonHoursSummary {
    pub person_name: String,
    pub weekly_hours: f64,
    pub monthly_hours: f64,
    pub weekly_target_hours: f64,
    pub monthly_target_hours: f64,
    pub is_under_weekly_target: bool,
    pub hours_remaining_this_month: f64,
}

impl PersonHoursSummary {
    /// Share of the weekly target reached, capped at 100.
    pub fn weekly_percentage(&self) -> f64 {
        if self.weekly_target_hours <= 0.0 {
            return 100.0;
        }
        (self.weekly_hours / self.weekly_target_hours * 100.0).min(100.0)
    }

    /// Hours still missing to reach the weekly target (never negative).
    pub fn hours_missing_this_week(&self) -> f64 {
        (self.weekly_target_hours - self.weekly_hours).max(0.0)
    }

    pub fn progress_emoji(&self) -> &'static str {
        let pct = if self.weekly_target_hours > 0.0 {
            self.weekly_hours / self.weekly_target_hours * 100.0
        } else {
            100.0
        };

        if pct >= 100.0 {
            "🎉"
        } else if pct >= 80.0 {
            "😄"
        } else if pct >= 60.0 {
            "😊"
        } else if pct >= 40.0 {
            "😐"
        } else if pct >= 20.0 {
            "😟"
        } else {
            "😴"
        }
    }
}
