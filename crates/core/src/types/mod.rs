pub mod outcome;
pub mod test_case;

// Re-export commonly used types
pub use outcome::{Status, TestResult};
pub use test_case::{SourceTestCase, TestCase};
