//! Testing utilities for the regional assignor
//!
//! Fixture builders and assignment checks shared by unit tests. Only compiled
//! for tests.

#![cfg(test)]

pub mod helpers;

pub use helpers::{assert_valid_assignment, fixed_leader, member, subscriptions};
