pub mod ca;
pub mod connection_profile;
pub mod enrollment;
pub mod fs;
pub mod gateway;
pub mod identity;
pub mod reqwest;
pub mod structured_file;
pub mod wallet;
