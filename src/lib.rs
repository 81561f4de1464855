pub mod config;
pub mod error;
pub mod export;
pub mod finance;
pub mod models;
pub mod processing;
pub mod service;
pub mod ui;

pub use error::{AppError, Result};
