//! In-memory adapters for tests and lightweight embedding.

mod assignments;
mod directory;
mod notifier;
mod tasks;

pub use assignments::InMemoryAssignmentRepository;
pub use directory::InMemoryEmployeeDirectory;
pub use notifier::RecordingNotifier;
pub use tasks::InMemoryTaskRepository;
