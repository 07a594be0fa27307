pub mod cover_store;
pub mod library;

pub use cover_store::InMemoryCoverStore;
pub use library::{InMemoryLibrary, InMemoryTransaction};
