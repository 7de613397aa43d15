pub mod entry;
pub mod error;
pub mod store;

pub use entry::{ActionLogEntry, LogStatus};
pub use error::AuditError;
pub use store::AuditStore;
