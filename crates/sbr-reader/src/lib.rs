#![warn(clippy::pedantic)]

pub mod error;
pub mod reader;
pub mod record;

mod op;

pub use error::ReadError;
pub use op::FieldCallback;
pub use reader::RecordReader;
pub use record::{FieldValue, Record};
