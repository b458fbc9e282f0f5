//! Then steps for recurring task reset cycle BDD scenarios.

use super::world::{ResetCycleWorld, run_async};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rota::task::{
    domain::{AssignmentStatus, EmployeeId, Task, TaskStatus},
    ports::{AssignmentRepository, TaskRepository},
};
use rstest_bdd_macros::then;

/// Loads the scenario task back from the repository.
fn stored_task(world: &ResetCycleWorld) -> Result<Task, eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    run_async(world.tasks.find_by_id(task_id))
        .wrap_err("load the scenario task")?
        .ok_or_else(|| eyre::eyre!("task is not stored"))
}

fn employee_id(world: &ResetCycleWorld, employee: &str) -> Result<EmployeeId, eyre::Report> {
    world
        .employees
        .get(employee)
        .copied()
        .ok_or_else(|| eyre::eyre!("unknown employee {employee} in scenario"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &ResetCycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = stored_task(world)?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then(r#"the task deadline is "{deadline}""#)]
fn task_deadline_is(world: &ResetCycleWorld, deadline: String) -> Result<(), eyre::Report> {
    let expected: DateTime<Utc> = deadline.parse().wrap_err("parse expected deadline")?;
    let stored = stored_task(world)?;
    eyre::ensure!(
        stored.deadline() == Some(expected),
        "expected deadline {expected}, found {:?}",
        stored.deadline()
    );
    Ok(())
}

#[then(r#"the assignment for "{employee}" is "{status}""#)]
fn assignment_status_is(
    world: &ResetCycleWorld,
    employee: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = AssignmentStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world
        .task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let assignment = run_async(world.assignments.find(task_id, employee_id(world, &employee)?))
        .wrap_err("load the scenario assignment")?
        .ok_or_else(|| eyre::eyre!("missing assignment for {employee}"))?;
    eyre::ensure!(
        assignment.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        assignment.status().as_str()
    );
    Ok(())
}

#[then(r#""{employee}" receives a "{kind}" notification"#)]
fn receives_notification(
    world: &ResetCycleWorld,
    employee: String,
    kind: String,
) -> Result<(), eyre::Report> {
    let recipient = employee_id(world, &employee)?;
    let delivered = world
        .notifier
        .recorded()
        .iter()
        .any(|notice| notice.recipient() == recipient && notice.kind().as_str() == kind);
    eyre::ensure!(delivered, "no {kind} notification delivered to {employee}");
    Ok(())
}

#[then(r#""{employee}" receives exactly one "{kind}" notification"#)]
fn receives_exactly_one_notification(
    world: &ResetCycleWorld,
    employee: String,
    kind: String,
) -> Result<(), eyre::Report> {
    let recipient = employee_id(world, &employee)?;
    let delivered = world
        .notifier
        .recorded()
        .iter()
        .filter(|notice| notice.recipient() == recipient && notice.kind().as_str() == kind)
        .count();
    eyre::ensure!(
        delivered == 1,
        "expected one {kind} notification for {employee}, found {delivered}"
    );
    Ok(())
}

#[then("no notifications are delivered")]
fn no_notifications(world: &ResetCycleWorld) -> Result<(), eyre::Report> {
    let recorded = world.notifier.recorded();
    eyre::ensure!(
        recorded.is_empty(),
        "expected no notifications, found {}",
        recorded.len()
    );
    Ok(())
}
