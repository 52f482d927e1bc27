//! Utility functions
//!
//! Pure functions for input masks and field validation, shared by the
//! record types and the command line.

pub mod formatting;
pub mod validation;
