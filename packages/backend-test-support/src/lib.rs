//! Test support utilities for the Thappy API
//!
//! Shared between the backend's unit and integration tests: unified logging
//! initialization, Problem Details assertions, and unique principal ids.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

pub use problem_details::assert_problem_details;
pub use unique_helpers::{unique_email, unique_principal_id};
