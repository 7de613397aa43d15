pub mod error;
pub mod service;
pub mod store;
pub mod version;

pub use error::PolicyStoreError;
pub use service::TenantPolicyService;
pub use store::PolicyStore;
pub use version::TenantPolicyVersion;
