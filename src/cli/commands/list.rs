use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::store::AttendanceStore;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceFilter;
use crate::ui::messages::warning;
use crate::utils::colors::{RESET, colorize_event};
use crate::utils::date::parse_period;
use crate::utils::describe_space;
use crate::utils::formatting::{pad_right, truncate};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        person,
        space,
        period,
    } = cmd
    {
        let (from, to) = match period {
            Some(p) if !p.eq_ignore_ascii_case("all") => {
                let (f, t) = parse_period(p)?;
                (Some(f), Some(t))
            }
            _ => (None, None),
        };

        let filter = AttendanceFilter {
            person_name: person.clone(),
            space: *space,
            from,
            to,
        };

        let mut pool = open_db(&cfg.database)?;
        let records = pool.load_filtered_attendance(&filter)?;

        if records.is_empty() {
            warning("No attendance records found.");
            return Ok(());
        }

        let header = Table::new(vec![
            Column::new("ID", 5),
            Column::new("Date", 10),
            Column::new("Time", 5),
            Column::new("Type", 6),
            Column::new("Name", 32),
            Column::new("Space", 10),
            Column::new("Distance", 9),
        ]);
        print!("{}", header.render());

        // colors go on already padded cells so columns stay aligned
        for r in &records {
            let (space_label, space_color) = describe_space(r.space);
            println!(
                "{} {} {} {} {} {}{}{} {}",
                pad_right(&r.id.map(|i| i.to_string()).unwrap_or_default(), 5),
                r.date_str(),
                pad_right(&r.time_of_day, 5),
                colorize_event(&pad_right(r.event_type.label(), 6), r.event_type.is_entry()),
                pad_right(&truncate(&r.person_name, 32), 32),
                space_color,
                pad_right(&space_label, 10),
                RESET,
                format!("{:.1}m", r.distance_meters),
            );
        }

        println!("\n{} record(s)", records.len());
    }
    Ok(())
}
