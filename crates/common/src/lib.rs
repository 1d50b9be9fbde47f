//! Shared utilities for the normalizer tools.

pub mod config;
pub mod formatter;
pub mod normal_form;

pub use config::{get_example_files, Config, EXAMPLE_DIR};
pub use formatter::TestResult;
pub use normal_form::NormalForm;
