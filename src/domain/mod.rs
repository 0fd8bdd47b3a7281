pub mod filter;
pub mod repository;
pub mod sanitize;
pub mod task;
pub mod validate;
