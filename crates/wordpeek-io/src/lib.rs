pub mod clipboard;
pub mod stdin;
pub mod ws;

pub use stdin::{InputParseError, parse_command};
