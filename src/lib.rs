pub mod config;
pub mod shell;
pub mod store;

pub use store::{Filter, StoreError, StoreEvent, StoreSnapshot, Todo, TodoId, TodoStore};
