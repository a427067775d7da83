pub mod error;
pub mod types;

pub use error::{Result, TodoError};
pub use types::{Filter, Query, Todo, TodoBlob, TodoCounts, TodoId, TodoPatch};
