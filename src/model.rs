use crate::core::{Query, Result, Todo, TodoCounts, TodoId, TodoPatch};

/// Read/write operations the [`Controller`](crate::Controller) needs.
///
/// Titles reaching `create` and `update` are already trimmed and
/// non-empty; validation lives in the controller.
pub trait TodoModel {
    fn create(&self, title: &str) -> Result<Todo>;

    fn read(&self, query: &Query) -> Result<Vec<Todo>>;

    fn read_all(&self) -> Result<Vec<Todo>> {
        self.read(&Query::all())
    }

    /// Merge `patch` into the record with `id`; returns the collection
    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>>;

    /// Returns the remaining collection
    fn remove(&self, id: TodoId) -> Result<Vec<Todo>>;

    fn remove_all(&self) -> Result<()>;

    /// Counts over the unfiltered collection
    fn count(&self) -> Result<TodoCounts>;
}

impl<M: TodoModel + ?Sized> TodoModel for &M {
    fn create(&self, title: &str) -> Result<Todo> {
        (**self).create(title)
    }

    fn read(&self, query: &Query) -> Result<Vec<Todo>> {
        (**self).read(query)
    }

    fn read_all(&self) -> Result<Vec<Todo>> {
        (**self).read_all()
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>> {
        (**self).update(id, patch)
    }

    fn remove(&self, id: TodoId) -> Result<Vec<Todo>> {
        (**self).remove(id)
    }

    fn remove_all(&self) -> Result<()> {
        (**self).remove_all()
    }

    fn count(&self) -> Result<TodoCounts> {
        (**self).count()
    }
}
