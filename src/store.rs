//! The task store: the authoritative ordered task list and its transitions.
//!
//! Every operation is total. Operations that reference an unknown id or an
//! out-of-range position leave the list untouched and return `None`; only
//! effective transitions replace the list and notify observers.
//!
//! The list lives behind an `Arc`. A transition builds a new `Vec` and swaps
//! it in, so a [`TaskStore::snapshot`] taken earlier never changes.

use std::sync::Arc;

use serde::Serialize;

use crate::drag::DropResult;
use crate::task::{IdSource, RandomIds, Task, TaskId};

/// An effective state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Added { id: TaskId, index: usize },
    Toggled { id: TaskId, is_complete: bool },
    Edited { id: TaskId },
    Deleted { id: TaskId, index: usize },
    Moved { id: TaskId, from: usize, to: usize },
}

impl Change {
    pub fn task_id(&self) -> TaskId {
        match self {
            Change::Added { id, .. }
            | Change::Toggled { id, .. }
            | Change::Edited { id }
            | Change::Deleted { id, .. }
            | Change::Moved { id, .. } => *id,
        }
    }
}

/// Receives every effective transition, after the new list is in place.
pub trait Observer {
    fn notify(&mut self, change: &Change, tasks: &[Task]);
}

/// Logs each transition at debug level.
#[derive(Debug, Default)]
pub struct TraceObserver;

impl Observer for TraceObserver {
    fn notify(&mut self, change: &Change, tasks: &[Task]) {
        tracing::debug!(
            task = %change.task_id().short(),
            ?change,
            total = tasks.len(),
            "task list changed"
        );
    }
}

pub struct TaskStore {
    tasks: Arc<Vec<Task>>,
    input: String,
    ids: Box<dyn IdSource>,
    observers: Vec<Box<dyn Observer>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_ids(Box::new(RandomIds))
    }

    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self {
            tasks: Arc::new(Vec::new()),
            input: String::new(),
            ids,
            observers: Vec::new(),
        }
    }

    /// Store pre-filled with `contents`, in order. Blank entries are skipped
    /// exactly as [`TaskStore::add`] would skip them.
    pub fn seeded<I, S>(ids: Box<dyn IdSource>, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::with_ids(ids);
        for content in contents {
            store.add(content.as_ref());
        }
        store
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn snapshot(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.tasks)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_complete).count()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == *id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == *id)
    }

    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.tasks.get(index).map(|task| task.id)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Add the pending input as a task. The buffer is cleared only when the
    /// add goes through.
    pub fn submit_input(&mut self) -> Option<Change> {
        let pending = self.input.clone();
        let change = self.add(&pending)?;
        self.input.clear();
        Some(change)
    }

    /// Append a new open task. Content is trimmed; blank content is ignored.
    pub fn add(&mut self, content: &str) -> Option<Change> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        debug_assert!(self.get(&id).is_none(), "id source reused {id}");
        let index = self.tasks.len();
        let mut next = Vec::with_capacity(index + 1);
        next.extend(self.tasks.iter().cloned());
        next.push(Task::new(id, content));
        Some(self.commit(next, Change::Added { id, index }))
    }

    pub fn toggle_complete(&mut self, id: &TaskId) -> Option<Change> {
        let is_complete = !self.get(id)?.is_complete;
        let next = self.replace_where(id, |task| Task {
            is_complete,
            ..task.clone()
        });
        Some(self.commit(next, Change::Toggled { id: *id, is_complete }))
    }

    /// Replace a task's content verbatim. Empty content is accepted here.
    pub fn update_content(&mut self, id: &TaskId, content: &str) -> Option<Change> {
        if self.get(id)?.content == content {
            return None;
        }
        let next = self.replace_where(id, |task| Task {
            content: content.to_string(),
            ..task.clone()
        });
        Some(self.commit(next, Change::Edited { id: *id }))
    }

    pub fn delete(&mut self, id: &TaskId) -> Option<Change> {
        let index = self.position(id)?;
        let next = self
            .tasks
            .iter()
            .filter(|task| task.id != *id)
            .cloned()
            .collect();
        Some(self.commit(next, Change::Deleted { id: *id, index }))
    }

    /// Move the task at `from` to `to`, shifting the tasks in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Option<Change> {
        let len = self.tasks.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        let mut next: Vec<Task> = self.tasks.as_ref().clone();
        let task = next.remove(from);
        let id = task.id;
        next.insert(to, task);
        Some(self.commit(next, Change::Moved { id, from, to }))
    }

    /// Apply a finished drag gesture; a cancelled drop changes nothing.
    pub fn apply_drop(&mut self, result: &DropResult) -> Option<Change> {
        let destination = result.destination?;
        self.reorder(result.source, destination)
    }

    fn replace_where(&self, id: &TaskId, update: impl Fn(&Task) -> Task) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|task| {
                if task.id == *id {
                    update(task)
                } else {
                    task.clone()
                }
            })
            .collect()
    }

    fn commit(&mut self, next: Vec<Task>, change: Change) -> Change {
        self.tasks = Arc::new(next);
        for observer in &mut self.observers {
            observer.notify(&change, &self.tasks);
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::task::SequentialIds;

    fn store() -> TaskStore {
        TaskStore::with_ids(Box::new(SequentialIds::new()))
    }

    fn contents(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|task| task.content.as_str()).collect()
    }

    struct Recorder(Rc<RefCell<Vec<(Change, usize)>>>);

    impl Observer for Recorder {
        fn notify(&mut self, change: &Change, tasks: &[Task]) {
            self.0.borrow_mut().push((*change, tasks.len()));
        }
    }

    #[test]
    fn add_trims_and_appends_open_task() {
        let mut store = store();
        let change = store.add("  Buy milk \n").expect("added");
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].content, "Buy milk");
        assert!(!store.tasks()[0].is_complete);
        assert_eq!(change, Change::Added { id: store.tasks()[0].id, index: 0 });
    }

    #[test]
    fn add_rejects_whitespace_only() {
        let mut store = store();
        store.add("A");
        let before = store.snapshot();
        assert!(store.add("   ").is_none());
        assert!(store.add("").is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn update_content_accepts_empty_and_keeps_spaces() {
        let mut store = store();
        store.add("A");
        let id = store.tasks()[0].id;
        assert!(store.update_content(&id, "").is_some());
        assert_eq!(store.tasks()[0].content, "");
        assert!(store.update_content(&id, " padded ").is_some());
        assert_eq!(store.tasks()[0].content, " padded ");
        assert!(store.update_content(&id, " padded ").is_none());
    }

    #[test]
    fn reorder_rejects_out_of_range_and_same_index() {
        let mut store = store();
        store.add("A");
        store.add("B");
        assert!(store.reorder(0, 2).is_none());
        assert!(store.reorder(2, 0).is_none());
        assert!(store.reorder(1, 1).is_none());
        assert_eq!(contents(&store), vec!["A", "B"]);
    }

    #[test]
    fn apply_drop_ignores_cancelled_gesture() {
        let mut store = store();
        store.add("A");
        store.add("B");
        assert!(store.apply_drop(&DropResult::cancelled(0)).is_none());
        assert!(store.apply_drop(&DropResult::moved(0, 1)).is_some());
        assert_eq!(contents(&store), vec!["B", "A"]);
    }

    #[test]
    fn submit_input_clears_only_on_success() {
        let mut store = store();
        store.set_input("   ");
        assert!(store.submit_input().is_none());
        assert_eq!(store.input(), "   ");

        store.set_input("Write report");
        assert!(store.submit_input().is_some());
        assert_eq!(store.input(), "");
        assert_eq!(contents(&store), vec!["Write report"]);
    }

    #[test]
    fn observers_see_effective_changes_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = store();
        store.subscribe(Box::new(Recorder(Rc::clone(&log))));

        store.add("A");
        store.add("");
        let id = store.tasks()[0].id;
        store.toggle_complete(&id);
        store.delete(&id);
        store.delete(&id);
        store.reorder(0, 0);

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], (Change::Added { id, index: 0 }, 1));
        assert_eq!(log[1], (Change::Toggled { id, is_complete: true }, 1));
        assert_eq!(log[2], (Change::Deleted { id, index: 0 }, 0));
    }

    #[test]
    fn snapshots_survive_later_transitions() {
        let mut store = store();
        store.add("A");
        let before = store.snapshot();
        let id = store.tasks()[0].id;
        store.toggle_complete(&id);
        store.update_content(&id, "changed");
        assert!(!before[0].is_complete);
        assert_eq!(before[0].content, "A");
        assert!(store.tasks()[0].is_complete);
    }

    #[test]
    fn seeded_skips_blank_entries() {
        let store = TaskStore::seeded(Box::new(SequentialIds::new()), ["A", " ", "B"]);
        assert_eq!(contents(&store), vec!["A", "B"]);
    }
}
