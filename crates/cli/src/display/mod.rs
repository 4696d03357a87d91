pub mod formatter;

pub use formatter::{JsonError, JsonReport, format_output, format_result_line, format_summary};
