pub mod constants;
pub mod error;
pub mod progress;
pub mod types;
