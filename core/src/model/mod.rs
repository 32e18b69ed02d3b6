pub mod task;

pub use task::{parse_due_date, Priority, Task};
