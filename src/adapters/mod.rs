pub mod in_memory;
pub mod local;
pub mod postgres;
