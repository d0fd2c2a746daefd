// Inbox Commands - 命令定义和处理器

mod reset_session;
mod seed_messages;
mod set_filter;
mod submit_message;

pub use reset_session::*;
pub use seed_messages::*;
pub use set_filter::*;
pub use submit_message::*;
