//! Scanner subsystem: test file discovery under configured root directories.

pub mod cancellation;
pub mod locator;
pub mod types;

pub use cancellation::ScanCancellation;
pub use locator::{find_test_files, is_test_file_name, TestFileLocator};
pub use types::LocatedFiles;
