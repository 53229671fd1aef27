use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tareas::config::Config;
use tareas::model::{Filter, Theme};
use tareas::output::Format;

#[derive(Parser)]
#[command(name = "tareas", version, about = "Persistent to-do list for the terminal")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    /// Directory holding the task and theme slots
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task at the top of the list
    Add {
        /// Task text (surrounding whitespace is trimmed)
        text: String,
    },
    /// List tasks under a filter, followed by the status line
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: Filter,
    },
    /// Display a single task
    Show {
        /// Task ID or unique prefix
        id: String,
    },
    /// Flip a task between pending and completed
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },
    /// Replace a task's text
    Edit {
        /// Task ID or unique prefix
        id: String,
        /// New text
        text: String,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
    /// Delete every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the pending/total summary
    Status,
    /// Show or change the light/dark theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Manage the checklist inside a task
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },
    /// Open the interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the stored theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Store a specific theme
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

#[derive(Subcommand)]
enum SubtaskAction {
    /// Append a subtask
    Add {
        /// Parent task ID or unique prefix
        task: String,
        /// Subtask text
        text: String,
    },
    /// Flip a subtask's completion
    Toggle {
        task: String,
        /// Subtask ID or unique prefix
        subtask: String,
    },
    /// Replace a subtask's text
    Edit {
        task: String,
        subtask: String,
        text: String,
    },
    /// Remove a subtask
    Delete { task: String, subtask: String },
}

fn run(cli: Cli, format: Format) -> tareas::error::Result<()> {
    let config = Config::resolve(cli.data_dir.as_deref())?;
    let root = config.data_dir;
    tracing::debug!(data_dir = %root.display(), "resolved data directory");

    match cli.command {
        Commands::Add { text } => tareas::commands::create::run(&root, text, format),
        Commands::List { filter } => tareas::commands::list::run(&root, filter, format),
        Commands::Show { id } => tareas::commands::show::run(&root, &id, format),
        Commands::Toggle { id } => tareas::commands::lifecycle::toggle(&root, &id, format),
        Commands::Edit { id, text } => tareas::commands::edit::run(&root, &id, text, format),
        Commands::Delete { id } => tareas::commands::delete::run(&root, &id, format),
        Commands::Clear { yes } => tareas::commands::clear::run(&root, yes, format),
        Commands::Status => tareas::commands::status::run(&root, format),
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => tareas::commands::theme::show(&root, format),
            ThemeAction::Toggle => tareas::commands::theme::toggle(&root, format),
            ThemeAction::Set { theme } => tareas::commands::theme::set(&root, theme, format),
        },
        Commands::Subtask { action } => match action {
            SubtaskAction::Add { task, text } => {
                tareas::commands::subtask::add(&root, &task, text, format)
            }
            SubtaskAction::Toggle { task, subtask } => {
                tareas::commands::subtask::toggle(&root, &task, &subtask, format)
            }
            SubtaskAction::Edit {
                task,
                subtask,
                text,
            } => tareas::commands::subtask::edit(&root, &task, &subtask, text, format),
            SubtaskAction::Delete { task, subtask } => {
                tareas::commands::subtask::delete(&root, &task, &subtask, format)
            }
        },
        Commands::Tui => tareas::commands::tui::run(&root, format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    tareas::logging::init(matches!(cli.command, Commands::Tui));
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
