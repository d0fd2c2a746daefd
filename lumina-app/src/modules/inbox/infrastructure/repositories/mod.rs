// Repository implementations

mod in_memory_message_repository;

pub use in_memory_message_repository::*;
