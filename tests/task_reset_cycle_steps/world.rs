//! Shared world state for recurring task reset cycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use rota::task::{
    adapters::memory::{
        InMemoryAssignmentRepository, InMemoryEmployeeDirectory, InMemoryTaskRepository,
        RecordingNotifier,
    },
    domain::{EmployeeId, LifecyclePolicy, Task},
    services::SweepService,
};
use rstest::fixture;

/// Clock pinned to the scenario's configured instant.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioClock(pub DateTime<Utc>);

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Sweep service type used by the BDD world.
pub type ScenarioSweeps = SweepService<
    InMemoryTaskRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeDirectory,
    RecordingNotifier,
    ScenarioClock,
>;

/// Scenario world for reset cycle behaviour tests.
pub struct ResetCycleWorld {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub assignments: Arc<InMemoryAssignmentRepository>,
    pub directory: Arc<InMemoryEmployeeDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub now: DateTime<Utc>,
    pub task: Option<Task>,
    pub employees: HashMap<String, EmployeeId>,
}

impl ResetCycleWorld {
    /// Creates a world with empty scenario state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            assignments: Arc::new(InMemoryAssignmentRepository::new()),
            directory: Arc::new(InMemoryEmployeeDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            now: DateTime::UNIX_EPOCH,
            task: None,
            employees: HashMap::new(),
        }
    }

    /// Clock pinned to the scenario instant.
    #[must_use]
    pub const fn clock(&self) -> ScenarioClock {
        ScenarioClock(self.now)
    }

    /// Builds a sweep service over the scenario adapters.
    #[must_use]
    pub fn sweeps(&self) -> ScenarioSweeps {
        SweepService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.assignments),
            Arc::clone(&self.directory),
            Arc::clone(&self.notifier),
            Arc::new(self.clock()),
            LifecyclePolicy::default(),
        )
    }
}

impl Default for ResetCycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResetCycleWorld {
    ResetCycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
