pub mod engine;
pub mod memory;
pub mod persistence;

pub use engine::BlobStorage;
pub use memory::MemoryStorage;
pub use persistence::FileStorage;
