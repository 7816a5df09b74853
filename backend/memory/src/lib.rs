pub mod store;

pub use store::{InMemoryStore, MemoryStore, NO_MEMORY_SENTINEL};
