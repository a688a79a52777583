#![forbid(unsafe_code)]

pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use http::{HttpLearnerStore, StoreConfig};
pub use memory::InMemoryLearnerStore;
pub use store::LearnerStore;
