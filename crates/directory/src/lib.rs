pub mod error;
pub mod memory;
pub mod model;
pub mod store;

pub use error::DirectoryError;
pub use memory::MemoryDirectory;
pub use model::{TenantSecrets, WorkflowMapping};
pub use store::TenantDirectory;
