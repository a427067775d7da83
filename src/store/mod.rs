//! Client-side todo collection persisted as a single blob.
//!
//! Every operation reads the whole blob, mutates an in-memory copy and
//! writes the whole blob back. Two `Store`s sharing a key and writing
//! alternately overwrite each other's changes: last writer wins.

pub mod id;

use crate::core::{Query, Result, Todo, TodoBlob, TodoCounts, TodoError, TodoId, TodoPatch};
use crate::model::TodoModel;
use crate::storage::BlobStorage;
use log::{debug, info, warn};
use std::sync::Mutex;

pub use id::{ID_LENGTH, ID_SPACE, IdSource, RandomIdSource, ScriptedIdSource};

pub struct Store<S: BlobStorage> {
    name: String,
    storage: S,
    ids: Mutex<Box<dyn IdSource>>,
}

impl<S: BlobStorage> Store<S> {
    /// Open the collection `name`, writing an empty blob if none exists yet.
    pub fn open(name: impl Into<String>, storage: S) -> Result<Self> {
        let name = name.into();
        if !storage.contains(&name)? {
            info!("Creating empty todo collection '{}'", name);
            storage.set(&name, &TodoBlob::default().to_json()?)?;
        }
        Ok(Self {
            name,
            storage,
            ids: Mutex::new(Box::new(RandomIdSource::new())),
        })
    }

    /// Replace the id generator
    pub fn with_id_source(self, source: impl IdSource + 'static) -> Self {
        Self {
            ids: Mutex::new(Box::new(source)),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Records matching every field set in `query`, in insertion order.
    pub fn find(&self, query: &Query) -> Result<Vec<Todo>> {
        let blob = self.load()?;
        Ok(blob.todos.into_iter().filter(|todo| query.matches(todo)).collect())
    }

    pub fn find_all(&self) -> Result<Vec<Todo>> {
        Ok(self.load()?.todos)
    }

    /// Create or update.
    ///
    /// Without an id, a fresh id is generated and the patch becomes a new
    /// record appended to the collection; the result holds only that
    /// record. With an id, the patch is merged into the first record
    /// carrying it and the result is the entire collection.
    pub fn save(&self, patch: TodoPatch, id: Option<TodoId>) -> Result<Vec<Todo>> {
        let mut blob = self.load()?;

        match id {
            Some(id) => {
                match blob.todos.iter_mut().find(|todo| todo.id == id) {
                    Some(todo) => patch.apply(todo),
                    None => warn!("Update of unknown todo {} in '{}'", id, self.name),
                }
                self.persist(&blob)?;
                Ok(blob.todos)
            }
            None => {
                let id = self.generate_id(&blob)?;
                let todo = patch.into_todo(id);
                blob.todos.push(todo.clone());
                self.persist(&blob)?;
                debug!("Created todo {} in '{}'", id, self.name);
                Ok(vec![todo])
            }
        }
    }

    /// Append a new incomplete record with `title`.
    pub fn insert(&self, title: impl Into<String>) -> Result<Todo> {
        let created = self.save(TodoPatch::title(title), None)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::Storage("create returned no record".to_string()))
    }

    pub fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>> {
        self.save(patch, Some(id))
    }

    /// Delete every record with `id`; returns what remains.
    pub fn remove(&self, id: TodoId) -> Result<Vec<Todo>> {
        let mut blob = self.load()?;
        let before = blob.todos.len();
        blob.todos.retain(|todo| todo.id != id);
        if blob.todos.len() == before {
            warn!("Removal of unknown todo {} in '{}'", id, self.name);
        }
        self.persist(&blob)?;
        Ok(blob.todos)
    }

    /// Empty the collection.
    pub fn drop_all(&self) -> Result<Vec<Todo>> {
        let blob = TodoBlob::default();
        self.persist(&blob)?;
        debug!("Dropped all todos in '{}'", self.name);
        Ok(blob.todos)
    }

    pub fn count(&self) -> Result<TodoCounts> {
        Ok(TodoCounts::from_todos(&self.load()?.todos))
    }

    fn load(&self) -> Result<TodoBlob> {
        match self.storage.get(&self.name)? {
            Some(raw) => TodoBlob::from_json(&raw),
            None => Ok(TodoBlob::default()),
        }
    }

    fn persist(&self, blob: &TodoBlob) -> Result<()> {
        blob.check_unique_ids()?;
        self.storage.set(&self.name, &blob.to_json()?)?;
        debug!("Wrote {} todos to '{}'", blob.todos.len(), self.name);
        Ok(())
    }

    fn generate_id(&self, blob: &TodoBlob) -> Result<TodoId> {
        if blob.todos.len() >= ID_SPACE {
            return Err(TodoError::IdSpaceExhausted);
        }
        let mut source = self.ids.lock()?;
        loop {
            let id = source.next_id();
            if !blob.contains_id(id) {
                return Ok(id);
            }
            debug!("Generated id {} already in use, drawing again", id);
        }
    }
}

impl<S: BlobStorage> TodoModel for Store<S> {
    fn create(&self, title: &str) -> Result<Todo> {
        self.insert(title)
    }

    fn read(&self, query: &Query) -> Result<Vec<Todo>> {
        self.find(query)
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>> {
        Store::update(self, id, patch)
    }

    fn remove(&self, id: TodoId) -> Result<Vec<Todo>> {
        Store::remove(self, id)
    }

    fn remove_all(&self) -> Result<()> {
        self.drop_all().map(|_| ())
    }

    fn count(&self) -> Result<TodoCounts> {
        Store::count(self)
    }
}
