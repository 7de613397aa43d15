pub mod store;

pub use store::MemoryPolicyStore;
