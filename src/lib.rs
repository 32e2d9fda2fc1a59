pub mod app;
pub mod data_sources;
pub mod models;
pub mod run_configs;
pub mod utils;
pub mod views;
