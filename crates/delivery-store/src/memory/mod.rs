//! In-process backends for local development and tests.

mod cache;
mod documents;

pub use cache::MemoryCacheStore;
pub use documents::MemoryStore;
