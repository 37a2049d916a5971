pub mod employees;
pub mod repository;
