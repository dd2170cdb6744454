pub mod collection;
pub mod components;
pub mod data_storage;
pub mod error;
pub mod inbound;
