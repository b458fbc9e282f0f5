//! Directory port resolving employee identity and device tokens.

use crate::task::domain::{Employee, EmployeeId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Employee directory contract.
///
/// The workforce roster lives outside this crate; the lifecycle engine only
/// resolves identities and device tokens through this port.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Resolves an employee by identifier.
    ///
    /// Returns `None` when the employee is unknown.
    async fn find(&self, id: EmployeeId) -> DirectoryResult<Option<Employee>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Backend lookup failure.
    #[error("directory lookup error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a backend lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
