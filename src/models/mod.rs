pub mod message;
pub mod patient;

pub use message::*;
pub use patient::*;
