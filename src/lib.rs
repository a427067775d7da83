// ============================================================================
// todokit Library
// ============================================================================

pub mod core;
pub mod storage;
pub mod store;
pub mod model;
pub mod controller;
pub mod config;
pub mod prelude;

// Re-export main types for convenience
pub use self::core::{Filter, Query, Result, Todo, TodoBlob, TodoCounts, TodoError, TodoId, TodoPatch};
pub use storage::{BlobStorage, FileStorage, MemoryStorage};
pub use store::{IdSource, RandomIdSource, ScriptedIdSource, Store};
pub use model::TodoModel;
pub use controller::{Controller, RecordingView, RenderCommand, Route, View, ViewEvent};
pub use config::{Backend, StoreConfig};

// ============================================================================
// Application wiring
// ============================================================================

/// A store and a controller bound to it, the way a page sets them up.
///
/// # Examples
///
/// ```
/// use todokit::{App, MemoryStorage, RecordingView, RenderCommand};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut app = App::new("todos", MemoryStorage::new(), RecordingView::new())?;
///
/// app.controller().set_view("#/")?;
/// app.controller().add_item("write docs")?;
///
/// let view = app.controller().view();
/// assert!(view.contains(&RenderCommand::ClearNewTodo));
/// # Ok(())
/// # }
/// ```
pub struct App<S: BlobStorage, V: View> {
    controller: Controller<Store<S>, V>,
}

impl<S: BlobStorage, V: View> App<S, V> {
    /// Open the collection `name` in `storage` and attach `view`.
    pub fn new(name: &str, storage: S, view: V) -> Result<Self> {
        let store = Store::open(name, storage)?;
        Ok(Self::with_store(store, view))
    }

    pub fn with_store(store: Store<S>, view: V) -> Self {
        Self {
            controller: Controller::new(store, view),
        }
    }

    pub fn controller(&mut self) -> &mut Controller<Store<S>, V> {
        &mut self.controller
    }

    pub fn store(&self) -> &Store<S> {
        self.controller.model()
    }
}

impl<V: View> App<Box<dyn BlobStorage>, V> {
    /// Build from configuration.
    ///
    /// ```
    /// # use todokit::{App, Backend, RecordingView, StoreConfig};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = StoreConfig::new("todos").backend(Backend::Memory);
    /// let mut app = App::from_config(&config, RecordingView::new())?;
    /// app.controller().set_view("#/active")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &StoreConfig, view: V) -> Result<Self> {
        Ok(Self::with_store(config.open()?, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_round_trip() {
        let mut app = App::new("todos", MemoryStorage::new(), RecordingView::new()).unwrap();
        app.controller().add_item("  first  ").unwrap();

        let todos = app.store().find_all().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "first");
        assert!(!todos[0].completed);
    }

    #[test]
    fn test_app_reads_existing_collection() {
        let storage = MemoryStorage::new();
        storage
            .set("todos", r#"{"todos":[{"id":5,"title":"old","completed":false}]}"#)
            .unwrap();
        let mut app = App::new("todos", storage, RecordingView::new()).unwrap();
        app.controller().set_view("").unwrap();

        let view = app.controller().view();
        assert!(view.contains(&RenderCommand::ShowEntries(vec![Todo::new(5, "old")])));
    }
}
