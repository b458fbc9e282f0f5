//! `PostgreSQL` adapters for task lifecycle persistence.

mod assignments;
mod directory;
mod models;
mod schema;
mod tasks;

pub use assignments::PostgresAssignmentRepository;
pub use directory::PostgresEmployeeDirectory;
pub use tasks::{PostgresTaskRepository, TaskPgPool};
