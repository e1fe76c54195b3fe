//! Property-based tests for the numeric tower.
