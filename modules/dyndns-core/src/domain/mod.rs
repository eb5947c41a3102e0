pub mod engine;
pub mod error;
pub mod models;
pub mod provisioner;
pub mod registry;
pub mod storage;

pub use engine::AliasEngine;
pub use error::EngineError;
pub use models::{Alias, AliasView, DomainConfig, ProvisionerConfig, User};
pub use provisioner::{Provisioner, ProvisionerError};
pub use registry::{DomainConflict, ProvisionerRegistry};
pub use storage::StorageBackend;
