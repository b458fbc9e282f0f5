//! Unit tests for notification copy rendering.

use super::support::{FixedClock, task_named, utc};
use crate::task::domain::{NotificationKind, Recurrence};
use crate::task::services::{NotificationCopy, NotificationTemplate};
use eyre::{bail, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at("2025-03-01T09:00:00Z")
}

#[rstest]
fn expiring_soon_copy_names_the_task_and_deadline(clock: FixedClock) {
    let task = task_named(
        "Clean the grease trap",
        Recurrence::Daily,
        utc("2025-03-01T23:59:59Z"),
        &clock,
    );

    let copy = NotificationCopy::default()
        .render(NotificationKind::TaskExpiringSoon, &task, task.deadline())
        .expect("render should succeed");

    assert_eq!(copy.title(), "Task Expiring Soon");
    assert_eq!(
        copy.body(),
        "Clean the grease trap is due by 01 Mar 2025 23:59."
    );
}

#[rstest]
fn expired_copy_states_the_missed_deadline(clock: FixedClock) {
    let task = task_named(
        "Clean the grease trap",
        Recurrence::Daily,
        utc("2025-03-01T23:59:59Z"),
        &clock,
    );

    let copy = NotificationCopy::default()
        .render(NotificationKind::TaskExpired, &task, task.deadline())
        .expect("render should succeed");

    assert_eq!(copy.title(), "Task Expired");
    assert_eq!(
        copy.body(),
        "Clean the grease trap passed its deadline of 01 Mar 2025 23:59 and has expired."
    );
}

#[rstest]
fn reset_copy_announces_the_next_cycle_not_the_stored_deadline(clock: FixedClock) {
    let task = task_named(
        "Stocktake",
        Recurrence::Weekly,
        utc("2025-03-07T23:59:59Z"),
        &clock,
    );

    let copy = NotificationCopy::default()
        .render(
            NotificationKind::TaskReset,
            &task,
            Some(utc("2025-03-14T23:59:59Z")),
        )
        .expect("render should succeed");

    assert_eq!(copy.title(), "Task Reset");
    assert_eq!(
        copy.body(),
        "Stocktake has started a new weekly cycle ending 14 Mar 2025 23:59."
    );
}

#[rstest]
fn a_missing_deadline_renders_as_unscheduled(clock: FixedClock) {
    let task = task_named(
        "Stocktake",
        Recurrence::Weekly,
        utc("2025-03-07T23:59:59Z"),
        &clock,
    );

    let copy = NotificationCopy::default()
        .render(NotificationKind::TaskExpiringSoon, &task, None)
        .expect("render should succeed");

    assert_eq!(copy.body(), "Stocktake is due by unscheduled.");
}

#[rstest]
fn replaced_templates_take_effect(clock: FixedClock) {
    let task = task_named(
        "Stocktake",
        Recurrence::Monthly,
        utc("2025-03-31T23:59:59Z"),
        &clock,
    );
    let copy_set = NotificationCopy::new().with_reset(NotificationTemplate::new(
        "Back on the rota",
        "{{ task_name }} runs again on its {{ recurrence }} cycle until {{ deadline }}",
    ));

    let copy = copy_set
        .render(
            NotificationKind::TaskReset,
            &task,
            Some(utc("2025-04-30T23:59:59Z")),
        )
        .expect("render should succeed");

    assert_eq!(copy.title(), "Back on the rota");
    assert_eq!(
        copy.body(),
        "Stocktake runs again on its monthly cycle until 30 Apr 2025 23:59"
    );
}

#[rstest]
fn syntax_errors_surface_the_failing_kind(clock: FixedClock) -> eyre::Result<()> {
    let task = task_named(
        "Stocktake",
        Recurrence::Weekly,
        utc("2025-03-07T23:59:59Z"),
        &clock,
    );
    let copy_set = NotificationCopy::new()
        .with_expired(NotificationTemplate::new("Task Expired", "{{ task_name"));

    let result = copy_set.render(NotificationKind::TaskExpired, &task, task.deadline());

    let Err(error) = result else {
        bail!("expected the render to fail");
    };
    ensure!(error.kind == NotificationKind::TaskExpired);
    ensure!(!error.reason.is_empty());
    Ok(())
}
