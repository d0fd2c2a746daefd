// Inbox Value Objects

mod analysis_response;
mod category;
mod entity;
mod filter;
mod message_id;
mod validation_mode;

pub use analysis_response::*;
pub use category::*;
pub use entity::*;
pub use filter::*;
pub use message_id::*;
pub use validation_mode::*;
