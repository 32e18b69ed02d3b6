pub mod error;
pub mod model;
pub mod reminder;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use model::task::{parse_due_date, Priority, Task};
pub use reminder::{
    Reminder, ReminderHandle, ReminderScheduler, DEFAULT_HORIZON_DAYS, DEFAULT_TICK_INTERVAL,
};
pub use storage::default_data_file;
pub use store::{SortKey, TaskStore};
