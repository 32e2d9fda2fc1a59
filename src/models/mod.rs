pub mod database;
pub mod log_entry;
pub mod log_recorder;
pub mod statistics;
pub mod trade;
pub mod trade_builder;
pub mod trade_export;
pub mod trade_store;
