#![warn(clippy::pedantic)]

pub mod byte_order;
pub mod error;
pub mod uint;

pub use byte_order::ByteOrder;
pub use error::CodecError;
pub use uint::{UintValue, UintWidth, decode_uints};
