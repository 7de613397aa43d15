pub mod context;
pub mod outcome;
pub mod types;

pub use context::ExecutionContext;
pub use outcome::{ActionFailure, ActionOutcome, ErrorCode};
pub use types::{ActionName, RequestId, TenantId, UserId};
