use clap::ValueEnum;
use colored::Colorize;

use crate::error::Result;
use crate::model::{Filter, Task, Theme};
use crate::status::StatusCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(task)?),
        Format::Pretty => {
            let text = if task.done {
                task.text.dimmed().strikethrough().to_string()
            } else {
                task.text.bold().to_string()
            };
            println!(
                "{} {} {}",
                checkbox(task.done),
                task.id.short().cyan(),
                text
            );
            for subtask in &task.subtasks {
                println!(
                    "    {} {} {}",
                    checkbox(subtask.done),
                    subtask.id.short().dimmed(),
                    subtask.text
                );
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:4} {}",
                task.id.short(),
                if task.done { "done" } else { "-" },
                truncate_text(&task.text, 60)
            );
        }
    }
    Ok(())
}

pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Print the visible tasks followed by the status line for the full collection.
pub fn print_tasks(
    tasks: &[&Task],
    filter: Filter,
    status: StatusCounts,
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => println!(
            "{}",
            serde_json::json!({
                "filter": filter,
                "tasks": tasks,
                "status": status,
            })
        ),
        Format::Pretty => {
            if tasks.is_empty() {
                println!("{}", "No tasks.".dimmed());
            }
            for task in tasks {
                print_task(task, Format::Pretty)?;
            }
            println!();
            print_status(status, Format::Pretty)?;
        }
        Format::Minimal => {
            println!("{:8} {:4} TEXT", "ID", "DONE");
            println!("{}", "-".repeat(50));
            for task in tasks {
                print_task(task, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_status(status: StatusCounts, format: Format) -> Result<()> {
    match format {
        Format::Json => println!(
            "{}",
            serde_json::json!({
                "pending": status.pending,
                "completed": status.completed(),
                "total": status.total,
                "message": status.to_string(),
            })
        ),
        Format::Pretty => println!("{}", status.to_string().dimmed()),
        Format::Minimal => println!("{status}"),
    }
    Ok(())
}

pub fn print_theme(theme: Theme, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::json!({ "theme": theme })),
        Format::Pretty | Format::Minimal => println!("{theme}"),
    }
    Ok(())
}

/// Report a no-op. JSON mode prints `null`.
pub fn print_unchanged(message: &str, format: Format) {
    match format {
        Format::Json => println!("null"),
        _ => eprintln!("{message}"),
    }
}
