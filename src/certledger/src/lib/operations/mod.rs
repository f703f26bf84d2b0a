pub mod enrollment;
pub mod transactions;
