use chrono::Local;
use nudge_core::{Task, TaskStore};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let today = Local::now().date_naive();
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| {
            let id = task.id.to_string();
            let overdue = !task.completed && task.due < today;
            TaskRow {
                id: id[..8].to_string(),
                status: if task.completed { "✔" } else { " " }.to_string(),
                priority: task.priority.to_string(),
                due: if overdue {
                    format!("{} (overdue)", task.due)
                } else {
                    task.due.to_string()
                },
                description: task.description.clone(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn progress_line(store: &TaskStore) -> String {
    format!("Progress: {}% completed", store.progress())
}
