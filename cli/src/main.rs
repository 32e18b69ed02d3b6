mod render;

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use nudge_core::{
    default_data_file, parse_due_date, Error, Priority, ReminderScheduler, SortKey, Task,
    TaskStore,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "A small task tracker that nags about due dates", long_about = None)]
struct Cli {
    /// Task file to use instead of ~/.nudge/tasks.json
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// What needs doing
        description: String,
        /// Task priority
        #[arg(short, long, value_enum, default_value = "medium")]
        priority: PriorityArg,
        /// Due date, YYYY-MM-DD
        #[arg(short, long)]
        due: String,
    },
    /// List tasks
    List {
        /// Re-order the stored list before printing
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Only show tasks with this priority
        #[arg(long)]
        priority: Option<String>,
    },
    /// Toggle completion of a task by id prefix
    Done {
        id: String,
    },
    /// Remove a task by id prefix
    Rm {
        id: String,
    },
    /// Show the completion percentage
    Progress,
    /// Run the reminder loop, printing upcoming-task notifications
    Watch {
        /// Seconds between reminder checks
        #[arg(long, default_value_t = 24 * 60 * 60)]
        interval_secs: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Priority,
    Due,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Priority => SortKey::Priority,
            SortArg::Due => SortKey::DueDate,
        }
    }
}

/// Resolves a user-typed id prefix against the store. Mismatches are user
/// notices, not errors.
fn resolve_id(store: &TaskStore, prefix: &str) -> Option<Uuid> {
    let matches: Vec<Uuid> = store
        .list()
        .iter()
        .filter(|t| t.id.to_string().starts_with(prefix))
        .map(|t| t.id)
        .collect();

    match matches.as_slice() {
        [id] => Some(*id),
        [] => {
            println!("No task matches '{}'.", prefix);
            None
        }
        _ => {
            println!("Id prefix '{}' is ambiguous.", prefix);
            None
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = match cli.file {
        Some(path) => path,
        None => default_data_file()?,
    };

    let mut store = TaskStore::new();
    match store.load(&path) {
        Ok(()) => {}
        // First run: nothing saved yet.
        Err(Error::NotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    match cli.command {
        Commands::Add {
            description,
            priority,
            due,
        } => {
            let due = match parse_due_date(&due) {
                Ok(d) => d,
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            };
            let task = Task::new(description, priority.into(), due);
            println!("Added: {}", task);
            store.add(task);
            store.save(&path)?;
        }
        Commands::List { sort, priority } => {
            if let Some(sort) = sort {
                store.sort_by(sort.into());
                store.save(&path)?;
            }
            match priority {
                Some(label) => render::print_tasks(&store.filter_by_priority(&label)),
                None => render::print_tasks(store.list()),
            }
        }
        Commands::Done { id } => {
            if let Some(task_id) = resolve_id(&store, &id) {
                if let Some(completed) = store.toggle(task_id) {
                    store.save(&path)?;
                    println!("{}", if completed { "Completed." } else { "Reopened." });
                }
            }
        }
        Commands::Rm { id } => {
            if let Some(task_id) = resolve_id(&store, &id) {
                if let Some(task) = store.remove(task_id) {
                    store.save(&path)?;
                    println!("Removed: {}", task);
                }
            }
        }
        Commands::Progress => {
            println!("{}", render::progress_line(&store));
        }
        Commands::Watch { interval_secs } => {
            println!(
                "Watching {} tasks; checking every {}s. Ctrl-C to quit.",
                store.len(),
                interval_secs
            );

            let store = Arc::new(Mutex::new(store));
            let (tx, rx) = mpsc::channel();
            let _handle = ReminderScheduler::new(store)
                .with_interval(Duration::from_secs(interval_secs))
                .start(tx);

            for reminder in rx {
                println!("Upcoming tasks:\n{}", reminder.body);
            }
        }
    }

    Ok(())
}
