pub mod error;
pub mod id_pool;
pub mod manager;
