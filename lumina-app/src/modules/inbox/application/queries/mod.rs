// Inbox Queries - 查询定义和处理器

mod get_stats;
mod list_messages;

pub use get_stats::*;
pub use list_messages::*;
