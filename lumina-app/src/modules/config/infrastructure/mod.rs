// Config Infrastructure Layer
//
// 配置来源的具体实现

pub mod env_repository;
pub mod memory_repository;

pub use env_repository::EnvConfigRepository;
pub use memory_repository::InMemoryConfigRepository;
