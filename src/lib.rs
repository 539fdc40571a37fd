pub mod config;
pub mod extract;
pub mod models;
pub mod pages;
pub mod scenario;
pub mod scoring;
pub mod session;
pub mod testdata;
pub mod utils;
pub mod wait;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
