pub mod stderr_wrapper;
