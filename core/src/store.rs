use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::model::task::Task;

/// Key for the in-place store sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    DueDate,
}

/// Ordered in-memory task collection. Insertion order is the natural order;
/// the sorts re-order it in place, everything else leaves it alone.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Appends. No dedup: equal-looking tasks are distinct entities.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Removes the task with the given id, returning it. Absent ids are a
    /// no-op, not an error.
    pub fn remove(&mut self, id: Uuid) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Flips the completion flag of the matching task and returns the new
    /// state. `None` when the id matches nothing.
    pub fn toggle(&mut self, id: Uuid) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.completed {
            task.reopen();
        } else {
            task.complete();
        }
        Some(task.completed)
    }

    /// Read access to the current order. Not a copy; any later mutation is
    /// visible through the next call.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Stable in-place sort. Ties keep their relative order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Priority => self.tasks.sort_by_key(|t| t.priority.rank()),
            SortKey::DueDate => self.tasks.sort_by_key(|t| t.due),
        }
    }

    /// Tasks whose priority label matches `label`, case-insensitively.
    /// Returns copies; the store order is untouched.
    pub fn filter_by_priority(&self, label: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority.matches(label))
            .cloned()
            .collect()
    }

    /// Completed share as an integer percentage, rounded down. 0 when the
    /// store is empty.
    pub fn progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        (completed * 100 / self.tasks.len()) as u8
    }

    /// Pending tasks due on or before `today + days`, overdue included,
    /// in store order.
    pub fn due_within(&self, today: NaiveDate, days: i64) -> Vec<Task> {
        let horizon = today + Duration::days(days);
        self.tasks
            .iter()
            .filter(|t| !t.completed && t.due <= horizon)
            .cloned()
            .collect()
    }

    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(desc: &str, priority: Priority, due: &str) -> Task {
        Task::new(desc.to_string(), priority, date(due))
    }

    #[test]
    fn add_and_remove_keep_the_count_straight() {
        let mut store = TaskStore::new();
        let a = task("a", Priority::High, "2024-01-01");
        let b = task("b", Priority::Low, "2024-01-02");
        let a_id = a.id;
        store.add(a);
        store.add(b);
        assert_eq!(store.len(), 2);

        assert!(store.remove(a_id).is_some());
        assert_eq!(store.len(), 1);

        // Absent id is a no-op.
        assert!(store.remove(a_id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn identical_fields_are_distinct_entities() {
        let mut store = TaskStore::new();
        let first = task("same", Priority::Medium, "2024-01-01");
        let second = task("same", Priority::Medium, "2024-01-01");
        let first_id = first.id;
        store.add(first);
        store.add(second);

        store.remove(first_id);
        assert_eq!(store.len(), 1);
        assert_ne!(store.list()[0].id, first_id);
    }

    #[test]
    fn toggle_flips_completion_and_ignores_unknown_ids() {
        let mut store = TaskStore::new();
        let t = task("t", Priority::High, "2024-01-01");
        let id = t.id;
        store.add(t);

        assert_eq!(store.toggle(id), Some(true));
        assert_eq!(store.toggle(id), Some(false));
        assert_eq!(store.toggle(Uuid::new_v4()), None);
    }

    #[test]
    fn sort_by_priority_is_stable_and_ranked() {
        let mut store = TaskStore::new();
        store.add(task("m1", Priority::Medium, "2024-01-01"));
        store.add(task("h1", Priority::High, "2024-01-02"));
        store.add(task("m2", Priority::Medium, "2024-01-03"));
        store.add(task("l1", Priority::Low, "2024-01-04"));
        store.add(task("h2", Priority::High, "2024-01-05"));

        store.sort_by(SortKey::Priority);

        let ranks: Vec<u8> = store.list().iter().map(|t| t.priority.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

        // Equal priorities keep insertion order.
        let order: Vec<&str> = store.list().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["h1", "h2", "m1", "m2", "l1"]);
    }

    #[test]
    fn unknown_priority_sorts_after_low() {
        let mut store = TaskStore::new();
        store.add(task("odd", Priority::Other("Urgent".to_string()), "2024-01-01"));
        store.add(task("low", Priority::Low, "2024-01-02"));

        store.sort_by(SortKey::Priority);
        let order: Vec<&str> = store.list().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["low", "odd"]);
    }

    #[test]
    fn sort_by_due_date_is_ascending() {
        let mut store = TaskStore::new();
        store.add(task("Pay rent", Priority::High, "2099-01-01"));
        store.add(task("Buy milk", Priority::Low, "2000-01-01"));

        store.sort_by(SortKey::DueDate);
        assert_eq!(store.list()[0].description, "Buy milk");
        assert_eq!(store.list()[1].description, "Pay rent");

        store.sort_by(SortKey::Priority);
        assert_eq!(store.list()[0].description, "Pay rent");
        assert_eq!(store.list()[1].description, "Buy milk");
    }

    #[test]
    fn filter_is_case_insensitive_and_leaves_order_alone() {
        let mut store = TaskStore::new();
        store.add(task("a", Priority::High, "2024-01-01"));
        store.add(task("b", Priority::Low, "2024-01-02"));
        store.add(task("c", Priority::High, "2024-01-03"));
        let before: Vec<Uuid> = store.list().iter().map(|t| t.id).collect();

        let lower = store.filter_by_priority("high");
        let upper = store.filter_by_priority("High");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 2);
        assert_eq!(lower[0].description, "a");
        assert_eq!(lower[1].description, "c");

        let after: Vec<Uuid> = store.list().iter().map(|t| t.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn progress_is_floored_percentage() {
        let mut store = TaskStore::new();
        assert_eq!(store.progress(), 0);

        for desc in ["a", "b", "c", "d"] {
            store.add(task(desc, Priority::Medium, "2024-01-01"));
        }
        let first = store.list()[0].id;
        store.toggle(first);
        assert_eq!(store.progress(), 25);

        // 2 of 3 completed floors to 66.
        let mut store = TaskStore::new();
        for desc in ["a", "b", "c"] {
            store.add(task(desc, Priority::Medium, "2024-01-01"));
        }
        let ids: Vec<Uuid> = store.list().iter().map(|t| t.id).collect();
        store.toggle(ids[0]);
        store.toggle(ids[1]);
        assert_eq!(store.progress(), 66);
    }

    #[test]
    fn due_within_matches_pending_tasks_up_to_the_horizon() {
        let today = date("2024-06-01");
        let mut store = TaskStore::new();

        store.add(task("due in two days", Priority::High, "2024-06-03"));
        let mut done = task("done tomorrow", Priority::High, "2024-06-02");
        done.complete();
        store.add(done);
        store.add(task("far out", Priority::Low, "2024-06-10"));
        store.add(task("long overdue", Priority::Low, "2024-05-01"));

        let due = store.due_within(today, 3);
        let order: Vec<&str> = due.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["due in two days", "long overdue"]);
    }

    #[test]
    fn due_within_includes_the_horizon_boundary() {
        let today = date("2024-06-01");
        let mut store = TaskStore::new();
        store.add(task("on the edge", Priority::Medium, "2024-06-04"));
        store.add(task("just past", Priority::Medium, "2024-06-05"));

        let due = store.due_within(today, 3);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].description, "on the edge");
    }
}
