pub mod ack;
pub mod endpoint;
pub mod error;
pub mod ring_buffer;
