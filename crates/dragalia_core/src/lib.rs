pub mod core_api;
pub mod document;
pub mod error;
pub mod identifier;
