pub mod json_file;
pub mod memory;

pub use json_file::{JsonFileSource, JsonFileStore};
pub use memory::{MemorySource, MemoryStore};
