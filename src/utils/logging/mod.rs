//! Logging, console output and progress display

pub mod console;
pub mod log;
pub mod progress;

pub use self::log::{init_logging, log_operation_complete, log_operation_start, log_warning};
pub use progress::{create_spinner, finish_and_clear};
