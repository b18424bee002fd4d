pub mod constants;
pub mod error;
pub mod pagination;
pub mod types;
