pub mod employees;
pub mod export;
pub mod stats;
