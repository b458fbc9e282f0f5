//! Unit tests for the task lifecycle module.
//!
//! Tests are organised by domain concept, covering happy paths, error cases,
//! and edge cases for all public APIs.

mod support;
mod templates_tests;
