//! Integration tests for the hammer and scalpel solver
//!
//! Tests are organized by topic:
//! - `baseline` - Unmitigated epidemic path
//! - `solver` - Backward induction and the policy path
//! - `scenarios` - Scenario drivers and the worker fan-out

mod scenarios;
