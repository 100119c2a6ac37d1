use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterStoreError {
    RemoteFetch(String),
    NotFound(String),
    HierarchyConflict(String),
    Configuration(String),
}

impl fmt::Display for ParameterStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteFetch(msg) => write!(f, "Remote fetch failed: {}", msg),
            Self::NotFound(msg) => write!(f, "Parameter not found: {}", msg),
            Self::HierarchyConflict(msg) => write!(f, "Hierarchy conflict: {}", msg),
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ParameterStoreError {}

pub type StoreResult<T> = Result<T, ParameterStoreError>;
