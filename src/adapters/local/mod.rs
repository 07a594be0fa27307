pub mod cover_store;

pub use cover_store::LocalCoverStore;
