//! Retrieval of AWS Systems Manager Parameter Store values as flat mappings,
//! nested hierarchies or process environment variables.

pub mod configs;
pub mod domain;
pub mod error;
pub mod remote;
pub mod store;

pub use domain::{FlatMapping, HierarchyNode, HierarchyTree, ParameterRecord};
pub use error::{ParameterStoreError, StoreResult};
pub use store::{ParameterStore, RetrievalOptions, set_environment};
