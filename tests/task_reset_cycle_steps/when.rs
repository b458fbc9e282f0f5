//! When steps for recurring task reset cycle BDD scenarios.

use super::world::{ResetCycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the expiry warning pass runs")]
fn warning_pass_runs(world: &mut ResetCycleWorld) -> Result<(), eyre::Report> {
    run_async(world.sweeps().notify_expiring()).wrap_err("run the expiry warning pass")?;
    Ok(())
}

#[when("the expiration pass runs")]
fn expiration_pass_runs(world: &mut ResetCycleWorld) -> Result<(), eyre::Report> {
    run_async(world.sweeps().expire_overdue()).wrap_err("run the expiration pass")?;
    Ok(())
}

#[when("the reset pass runs")]
fn reset_pass_runs(world: &mut ResetCycleWorld) -> Result<(), eyre::Report> {
    run_async(world.sweeps().reset_recurring()).wrap_err("run the reset pass")?;
    Ok(())
}
