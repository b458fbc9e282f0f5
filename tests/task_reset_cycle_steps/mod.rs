//! Step definitions for recurring task reset cycle BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;
