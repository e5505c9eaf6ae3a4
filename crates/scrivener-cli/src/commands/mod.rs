//! Command implementations.

mod analyze;
mod generate;
mod verify;

pub use analyze::execute_analyze;
pub use generate::execute_generate;
pub use verify::execute_verify;
