pub mod logger;
pub mod macros;
pub mod types;
