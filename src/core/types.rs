use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Result, TodoError};

/// Store-assigned record id. Unique among live records, never reassigned
/// while the record exists.
pub type TodoId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Partial update of a [`Todo`]. Only the `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Shallow field overwrite; the id is never touched.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }

    /// Record built from the patch on the create path.
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        }
    }
}

/// Partial-match query: a record matches when every `Some` field equals
/// the record's field. The default query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub id: Option<TodoId>,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: TodoId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.id.is_none_or(|id| id == todo.id)
            && self.title.as_deref().is_none_or(|title| title == todo.title)
            && self.completed.is_none_or(|completed| completed == todo.completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn query(self) -> Query {
        match self {
            Filter::All => Query::all(),
            Filter::Active => Query::by_completed(false),
            Filter::Completed => Query::by_completed(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoCounts {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

impl TodoCounts {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            active: todos.len() - completed,
            completed,
            total: todos.len(),
        }
    }
}

/// The persisted unit: the whole collection under one storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoBlob {
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoBlob {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn contains_id(&self, id: TodoId) -> bool {
        self.todos.iter().any(|todo| todo.id == id)
    }

    /// Rejects a collection in which two records share an id.
    pub fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.todos.len());
        for todo in &self.todos {
            if !seen.insert(todo.id) {
                return Err(TodoError::DuplicateId(todo.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut todo = Todo::new(7, "buy milk");
        TodoPatch::completed(true).apply(&mut todo);
        assert_eq!(todo, Todo::new(7, "buy milk").completed(true));

        TodoPatch::title("buy oat milk").apply(&mut todo);
        assert_eq!(todo.title, "buy oat milk");
        assert!(todo.completed);
        assert_eq!(todo.id, 7);
    }

    #[test]
    fn test_query_matches_every_given_field() {
        let todo = Todo::new(1, "a").completed(true);
        assert!(Query::all().matches(&todo));
        assert!(Query::by_id(1).matches(&todo));
        assert!(!Query::by_id(2).matches(&todo));

        let query = Query {
            id: Some(1),
            completed: Some(false),
            ..Query::default()
        };
        assert!(!query.matches(&todo));
    }

    #[test]
    fn test_counts() {
        let todos = vec![
            Todo::new(1, "a"),
            Todo::new(2, "b").completed(true),
            Todo::new(3, "c"),
        ];
        let counts = TodoCounts::from_todos(&todos);
        assert_eq!(counts, TodoCounts { active: 2, completed: 1, total: 3 });
    }

    #[test]
    fn test_blob_wire_format() {
        let blob = TodoBlob::from_json(r#"{"todos":[{"id":123456,"title":"x","completed":false}]}"#).unwrap();
        assert_eq!(blob.todos, vec![Todo::new(123456, "x")]);

        let empty = TodoBlob::from_json("{}").unwrap();
        assert!(empty.todos.is_empty());
        assert_eq!(TodoBlob::default().to_json().unwrap(), r#"{"todos":[]}"#);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let blob = TodoBlob {
            todos: vec![Todo::new(4, "a"), Todo::new(4, "b")],
        };
        assert!(matches!(blob.check_unique_ids(), Err(TodoError::DuplicateId(4))));
    }
}
