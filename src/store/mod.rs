//! In-memory to-do state: the item list, the selected filter, derived views
//! and the actions that change them.
//!
//! Consumers observe changes either by subscribing to [`StoreEvent`]s or by
//! comparing [`StoreSnapshot`]s taken before and after an action.

pub mod error;
pub mod models;
pub mod subscription;

pub use error::StoreError;
pub use models::{Filter, Todo, TodoId};
pub use subscription::{StoreEvent, SubscriptionId};

use serde::{Deserialize, Serialize};
use subscription::Subscribers;
use tracing::debug;

/// Owned copy of the store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub filter: Filter,
    pub todos: Vec<Todo>,
    pub next_id: TodoId,
}

#[derive(Debug, Default)]
pub struct TodoStore {
    filter: Filter,
    todos: Vec<Todo>,
    next_id: u64,
    subscribers: Subscribers,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn next_id(&self) -> TodoId {
        TodoId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn find_todo(&self, id: TodoId) -> Result<&Todo, StoreError> {
        self.todos
            .iter()
            .find(|todo| todo.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn find_todo_mut(&mut self, id: TodoId) -> Result<&mut Todo, StoreError> {
        self.todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn finished_todos(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| todo.finished).collect()
    }

    pub fn unfinished_todos(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| !todo.finished).collect()
    }

    pub fn filtered_todos(&self) -> Vec<&Todo> {
        match self.filter {
            Filter::Finished => self.finished_todos(),
            Filter::Unfinished => self.unfinished_todos(),
            Filter::All => self.todos.iter().collect(),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            filter: self.filter,
            todos: self.todos.clone(),
            next_id: self.next_id(),
        }
    }

    /// Appends an unfinished todo and returns its id. Any label is accepted,
    /// including the empty string.
    pub fn add_todo(&mut self, label: impl Into<String>) -> TodoId {
        let id = TodoId(self.next_id);
        self.next_id += 1;
        self.todos.push(Todo::new(id, label.into()));
        debug!(%id, "todo added");

        self.subscribers.notify(&StoreEvent::TodoAdded { id });
        id
    }

    /// Flips the `finished` flag of the todo with `id` and returns the new
    /// value. Leaves the store untouched when no such todo exists.
    pub fn toggle_todo(&mut self, id: TodoId) -> Result<bool, StoreError> {
        let finished = self.find_todo_mut(id)?.toggle();
        debug!(%id, finished, "todo toggled");

        self.subscribers
            .notify(&StoreEvent::TodoToggled { id, finished });
        Ok(finished)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }
        let from = std::mem::replace(&mut self.filter, filter);
        debug!(%from, to = %filter, "filter changed");

        self.subscribers
            .notify(&StoreEvent::FilterChanged { from, to: filter });
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ids(todos: &[&Todo]) -> Vec<u64> {
        todos.iter().map(|todo| todo.id.0).collect()
    }

    fn recording_store() -> (TodoStore, Rc<RefCell<Vec<StoreEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = TodoStore::new();
        let sink = Rc::clone(&events);
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (store, events)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TodoStore::new();
        assert_eq!(store.filter(), Filter::All);
        assert!(store.is_empty());
        assert_eq!(store.next_id(), TodoId(0));
        assert!(store.filtered_todos().is_empty());
    }

    #[test]
    fn test_with_filter() {
        let store = TodoStore::with_filter(Filter::Unfinished);
        assert_eq!(store.filter(), Filter::Unfinished);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_todo_assigns_increasing_ids() {
        let mut store = TodoStore::new();
        let assigned: Vec<TodoId> = (0..5).map(|i| store.add_todo(format!("task {i}"))).collect();

        assert_eq!(assigned, (0..5).map(TodoId).collect::<Vec<_>>());
        assert!(assigned.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(store.next_id(), TodoId(5));
        assert!(store.todos().iter().all(|todo| todo.id < store.next_id()));
    }

    #[test]
    fn test_add_todo_accepts_empty_label() {
        let mut store = TodoStore::new();
        let id = store.add_todo("");

        let todo = store.find_todo(id).unwrap();
        assert_eq!(todo.label, "");
        assert!(!todo.finished);
        assert_eq!(ids(&store.filtered_todos()), vec![0]);
    }

    #[test]
    fn test_find_todo_not_found() {
        let mut store = TodoStore::new();
        store.add_todo("buy milk");
        assert_eq!(store.find_todo(TodoId(9)), Err(StoreError::NotFound(TodoId(9))));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = TodoStore::new();
        let id = store.add_todo("buy milk");

        assert_eq!(store.toggle_todo(id), Ok(true));
        assert!(store.find_todo(id).unwrap().finished);
        assert_eq!(store.toggle_todo(id), Ok(false));
        assert!(!store.find_todo(id).unwrap().finished);
    }

    #[test]
    fn test_toggle_missing_leaves_state_unchanged() {
        let (mut store, events) = recording_store();
        store.add_todo("buy milk");
        let before = store.snapshot();
        events.borrow_mut().clear();

        assert_eq!(store.toggle_todo(TodoId(1)), Err(StoreError::NotFound(TodoId(1))));
        assert_eq!(store.snapshot(), before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_finished_and_unfinished_partition_todos() {
        let mut store = TodoStore::new();
        for label in ["a", "b", "c", "d", "e"] {
            store.add_todo(label);
        }
        store.toggle_todo(TodoId(1)).unwrap();
        store.toggle_todo(TodoId(3)).unwrap();
        store.toggle_todo(TodoId(4)).unwrap();
        store.toggle_todo(TodoId(4)).unwrap();

        let finished = ids(&store.finished_todos());
        let unfinished = ids(&store.unfinished_todos());
        assert_eq!(finished, vec![1, 3]);
        assert_eq!(unfinished, vec![0, 2, 4]);

        let mut all: Vec<u64> = finished.iter().chain(unfinished.iter()).copied().collect();
        all.sort();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_filtered_todos_follows_filter() {
        let mut store = TodoStore::new();
        store.add_todo("a");
        store.add_todo("b");
        store.toggle_todo(TodoId(1)).unwrap();

        assert_eq!(ids(&store.filtered_todos()), vec![0, 1]);
        store.set_filter(Filter::Finished);
        assert_eq!(ids(&store.filtered_todos()), vec![1]);
        store.set_filter(Filter::Unfinished);
        assert_eq!(ids(&store.filtered_todos()), vec![0]);
        store.set_filter(Filter::All);
        assert_eq!(ids(&store.filtered_todos()), vec![0, 1]);
    }

    #[test]
    fn test_buy_milk_walk_dog_scenario() {
        let mut store = TodoStore::new();

        store.add_todo("buy milk");
        assert_eq!(
            store.todos(),
            &[Todo {
                id: TodoId(0),
                label: "buy milk".to_string(),
                finished: false,
            }]
        );

        store.add_todo("walk dog");
        assert_eq!(ids(&store.todos().iter().collect::<Vec<_>>()), vec![0, 1]);

        store.toggle_todo(TodoId(0)).unwrap();
        let finished = store.finished_todos();
        assert_eq!(ids(&finished), vec![0]);
        assert!(finished[0].finished);
        assert_eq!(ids(&store.unfinished_todos()), vec![1]);

        store.set_filter(Filter::Finished);
        let filtered = store.filtered_todos();
        assert_eq!(ids(&filtered), vec![0]);
        assert_eq!(filtered[0].label, "buy milk");
    }

    #[test]
    fn test_events_follow_actions() {
        let (mut store, events) = recording_store();

        let id = store.add_todo("buy milk");
        store.toggle_todo(id).unwrap();
        store.set_filter(Filter::Finished);

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::TodoAdded { id: TodoId(0) },
                StoreEvent::TodoToggled {
                    id: TodoId(0),
                    finished: true,
                },
                StoreEvent::FilterChanged {
                    from: Filter::All,
                    to: Filter::Finished,
                },
            ]
        );
    }

    #[test]
    fn test_same_filter_emits_nothing() {
        let (mut store, events) = recording_store();
        store.set_filter(Filter::All);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribed_listener_not_called() {
        let (mut store, events) = recording_store();
        let extra = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&extra);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.add_todo("a");
        assert!(store.unsubscribe(id));
        store.add_todo("b");

        assert_eq!(*extra.borrow(), 1);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_snapshot_diffing() {
        let mut store = TodoStore::new();
        store.add_todo("a");
        let before = store.snapshot();

        store.toggle_todo(TodoId(0)).unwrap();
        let after = store.snapshot();

        assert_ne!(before, after);
        assert!(!before.todos[0].finished);
        assert!(after.todos[0].finished);
        assert_eq!(after.next_id, TodoId(1));
    }
}
