mod analyzed_message;

pub use analyzed_message::*;
