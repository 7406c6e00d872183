//! Application service layer - config, scanning, detection use case, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
pub mod scanner;
