//! XML element tree and its text codec

pub mod model;
pub mod namespace;
pub mod parser;
pub mod writer;

pub use model::{Attributes, Element};
pub use namespace::remove_namespace;
pub use parser::{parse, Parser};
pub use writer::{to_string, WriteOptions};
