pub mod gateway;

pub use gateway::{Payload, RemoteGateway};
