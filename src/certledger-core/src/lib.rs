pub mod ca;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod fs;
pub mod gateway;
pub mod identity;
pub mod json;
pub mod wallet;
