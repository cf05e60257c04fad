pub mod config_store;
pub mod fs;
pub mod runtime_client;
pub mod session_store;
