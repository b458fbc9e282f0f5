//! Given steps for recurring task reset cycle BDD scenarios.

use super::world::{ResetCycleWorld, run_async};
use eyre::WrapErr;
use rota::task::{
    domain::{
        Assignment, AssignmentStatus, DeviceToken, Employee, EmployeeId, EmployeeRole,
        Recurrence, Task, TaskName,
    },
    ports::{AssignmentRepository, TaskRepository},
};
use rstest_bdd_macros::given;

#[given(r#"the time is "{timestamp}""#)]
fn time_is(world: &mut ResetCycleWorld, timestamp: String) -> Result<(), eyre::Report> {
    world.now = timestamp.parse().wrap_err("parse scenario timestamp")?;
    Ok(())
}

#[given(r#"a {cadence} task "{name}" due "{deadline}""#)]
fn seeded_task(
    world: &mut ResetCycleWorld,
    cadence: String,
    name: String,
    deadline: String,
) -> Result<(), eyre::Report> {
    let recurrence = match cadence.as_str() {
        "one-off" => Recurrence::Once,
        other => Recurrence::try_from(other)
            .map_err(|err| eyre::eyre!("invalid cadence in scenario: {err}"))?,
    };
    let task_name =
        TaskName::new(name).map_err(|err| eyre::eyre!("invalid task name in scenario: {err}"))?;
    let due = deadline.parse().wrap_err("parse scenario deadline")?;
    let task = Task::new(task_name, recurrence, due, &world.clock());
    run_async(world.tasks.store(&task)).wrap_err("store scenario task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#""{employee}" is assigned to the task"#)]
fn employee_assigned(world: &mut ResetCycleWorld, employee: String) -> Result<(), eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let employee_id = EmployeeId::new();
    let token = DeviceToken::new(format!("device-{employee}"))
        .map_err(|err| eyre::eyre!("invalid device token in scenario: {err}"))?;
    world
        .directory
        .insert(Employee::new(employee_id, EmployeeRole::Employee).with_device_token(token))
        .wrap_err("register scenario employee")?;
    run_async(
        world
            .assignments
            .store(&Assignment::new(task_id, employee_id, &world.clock())),
    )
    .wrap_err("store scenario assignment")?;
    world.employees.insert(employee, employee_id);
    Ok(())
}

#[given(r#""{employee}" has completed the task"#)]
fn employee_completed(world: &mut ResetCycleWorld, employee: String) -> Result<(), eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let employee_id = *world
        .employees
        .get(&employee)
        .ok_or_else(|| eyre::eyre!("unknown employee {employee} in scenario"))?;
    let mut assignment = run_async(world.assignments.find(task_id, employee_id))
        .wrap_err("load scenario assignment")?
        .ok_or_else(|| eyre::eyre!("missing assignment for {employee}"))?;
    assignment
        .transition_to(AssignmentStatus::Completed, &world.clock())
        .wrap_err("complete scenario assignment")?;
    run_async(world.assignments.update(&assignment)).wrap_err("update scenario assignment")?;
    Ok(())
}
