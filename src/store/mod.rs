//! Goal store backends

pub mod memory;

pub use memory::MemoryGoalStore;
