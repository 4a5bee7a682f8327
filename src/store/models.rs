use super::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TodoId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub label: String,
    pub finished: bool,
}

impl Todo {
    pub fn new(id: TodoId, label: String) -> Self {
        Self {
            id,
            label,
            finished: false,
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.finished = !self.finished;
        self.finished
    }
}

/// Selects which todos `TodoStore::filtered_todos` exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Finished,
    Unfinished,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Finished, Filter::Unfinished];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Finished => "finished",
            Filter::Unfinished => "unfinished",
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Finished => todo.finished,
            Filter::Unfinished => !todo.finished,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Filter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StoreError::InvalidFilter(wanted.to_string()))
    }
}
