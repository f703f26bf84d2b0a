pub mod connection_profile;
pub mod participant;
