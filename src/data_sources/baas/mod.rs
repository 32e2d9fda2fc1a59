pub mod memory_client;
pub mod rest_client;
pub mod table_client;
