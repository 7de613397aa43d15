pub mod action;
pub mod builder;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod validate;

pub use action::{Action, ActionError};
pub use builder::DispatcherBuilder;
pub use dispatcher::{DispatchRequest, Dispatcher, IdempotencyMode};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use registry::ActionRegistry;
