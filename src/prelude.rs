//! Glob-importable surface for applications embedding the task list.
//!
//! ```
//! use todokit::prelude::*;
//! ```

pub use crate::{
    App, BlobStorage, Controller, Filter, MemoryStorage, Query, RenderCommand, Result, Route,
    Store, Todo, TodoError, TodoId, TodoModel, TodoPatch, View, ViewEvent,
};
