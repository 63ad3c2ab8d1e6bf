use crate::cli::parser::{Commands, TaskCommands};
use crate::config::Config;
use crate::core::tasks::{TaskChanges, TaskLogic};
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::models::task::{TaskEntry, TaskFilter};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};
use crate::utils::date;
use crate::utils::formatting::{pad_right, short_name, truncate};
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;

fn print_tasks(tasks: &[TaskEntry], cfg: &Config, today: NaiveDate) {
    let table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("Date", 10),
        Column::new("Due", 10),
        Column::new("Status", 9),
        Column::new("Title", 30),
        Column::new("Responsible", 20),
        Column::new("Category", 20),
    ]);
    print!("{}", table.render());

    for t in tasks {
        let (status, color) = if t.completed {
            ("done", GREEN)
        } else if t.is_overdue(today) {
            ("overdue", RED)
        } else {
            ("pending", YELLOW)
        };
        println!(
            "{} {} {} {color}{}{RESET} {} {} {}",
            pad_right(&t.id.map(|i| i.to_string()).unwrap_or_default(), 4),
            t.event_date,
            t.due_date,
            pad_right(status, 9),
            pad_right(&truncate(&t.title, 30), 30),
            pad_right(&truncate(&short_name(&t.responsible), 20), 20),
            truncate(cfg.category_label(&t.category), 20),
        );
    }
}

fn optional_date(s: &Option<String>) -> AppResult<Option<NaiveDate>> {
    s.as_deref().map(date::require_date).transpose()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Task { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;
    let today = date::today();

    match action {
        TaskCommands::Add {
            title,
            responsible,
            category,
            description,
            date: date_arg,
            due,
        } => {
            let event_date = date::date_or_today(date_arg.as_deref())?;
            let task = TaskEntry::new(
                event_date,
                optional_date(due)?,
                title,
                description,
                responsible,
                category,
            );
            if !cfg.categories.contains_key(category) {
                warning(format!("Category '{category}' is not configured, stored as is"));
            }
            let task = TaskLogic::add(&mut pool, task)?;
            success(format!(
                "Task #{} added: {} (due {})",
                task.id.unwrap_or_default(),
                task.title,
                task.due_date
            ));
        }

        TaskCommands::List {
            responsible,
            status,
            overdue,
            when,
        } => {
            let tasks = TaskLogic::by_time_filter(&mut pool, *when, today)?;
            if let Some(r) = responsible {
                let known = TaskLogic::unique_responsibles(&tasks);
                if !known.contains(r) {
                    warning(format!("No tasks for '{r}'. Responsibles: {}", known.join(", ")));
                    return Ok(());
                }
            }
            let filter = TaskFilter {
                responsible: responsible.clone(),
                status: *status,
                overdue_only: *overdue,
            };
            let tasks = if filter.is_empty() {
                tasks
            } else {
                TaskLogic::filter(&tasks, &filter, today)
            };

            info(when.label(today));
            if tasks.is_empty() {
                warning("No tasks found.");
                return Ok(());
            }
            print_tasks(&tasks, cfg, today);
            println!("\n{} task(s)", tasks.len());
        }

        TaskCommands::Done { id } => {
            TaskLogic::set_completed(&mut pool, *id, true)?;
            success(format!("Task #{id} marked as completed"));
        }

        TaskCommands::Undo { id } => {
            TaskLogic::set_completed(&mut pool, *id, false)?;
            success(format!("Task #{id} marked as pending"));
        }

        TaskCommands::Toggle { id } => {
            let completed = TaskLogic::toggle(&mut pool, *id)?;
            let state = if completed { "completed" } else { "pending" };
            success(format!("Task #{id} is now {state}"));
        }

        TaskCommands::Edit {
            id,
            title,
            description,
            responsible,
            category,
            date: date_arg,
            due,
        } => {
            let changes = TaskChanges {
                title: title.clone(),
                description: description.clone(),
                responsible: responsible.clone(),
                category: category.clone(),
                event_date: optional_date(date_arg)?,
                due_date: optional_date(due)?,
            };
            if changes.is_empty() {
                return Err(AppError::InvalidTask("nothing to change".into()));
            }
            let task = TaskLogic::update(&mut pool, *id, changes)?;
            success(format!("Task #{id} updated: {}", task.title));
        }

        TaskCommands::Stats { when } => {
            let tasks = TaskLogic::by_time_filter(&mut pool, *when, today)?;
            header(format!("Task statistics - {}", when.label(today)));

            if tasks.is_empty() {
                warning("No tasks found.");
                return Ok(());
            }

            let mut people = Table::new(vec![
                Column::new("Responsible", 28),
                Column::new("Total", 6),
                Column::new("Done", 6),
                Column::new("Pending", 7),
            ]);
            for s in TaskLogic::responsible_stats(&tasks) {
                people.add_row(vec![
                    truncate(&s.responsible, 28),
                    s.total.to_string(),
                    s.completed.to_string(),
                    s.pending.to_string(),
                ]);
            }
            println!("{}", people.render());

            let mut cats = Table::new(vec![Column::new("Category", 32), Column::new("Tasks", 6)]);
            for (label, n) in TaskLogic::category_stats(cfg, &tasks) {
                cats.add_row(vec![truncate(&label, 32), n.to_string()]);
            }
            println!("{}", cats.render());

            let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
            println!("{} task(s), {} overdue", tasks.len(), overdue);
        }

        TaskCommands::Categories => {
            let tasks = TaskLogic::load_all(&mut pool)?;
            for label in TaskLogic::category_labels(cfg, &tasks) {
                let code = cfg
                    .categories
                    .iter()
                    .find(|(_, l)| **l == label)
                    .map(|(c, _)| c.as_str())
                    .unwrap_or(label.as_str());
                println!("{} {}", pad_right(code, 28), label);
            }
        }
    }

    Ok(())
}
