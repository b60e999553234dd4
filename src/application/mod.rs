// Application layer: the service every client goes through.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
