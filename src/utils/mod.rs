//! Shared utilities: Arrow column access and logging/console output

pub mod arrow;
pub mod logging;
