pub mod backup;
mod file_storage;
mod memory;
mod store;

pub use file_storage::{FileStore, Result, StudyError};
pub use memory::MemoryStore;
pub use store::StudyStore;
