pub mod diagnosis;
pub mod environment;
pub mod error;
pub mod logger;
pub mod operations;
