//! Command handlers
//!
//! Each handler module contains the execution logic for one CLI command, the
//! pure helpers it is built from, and tests for those helpers.

pub mod check;
pub mod generate;
pub mod selector;

pub use check::{check_file, execute_check};
pub use generate::{execute_generate, stream_document, GenerateSummary};
pub use selector::{execute_selector, render_selector};
