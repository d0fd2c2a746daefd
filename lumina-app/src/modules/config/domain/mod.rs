// Config Domain Layer
//
// 配置领域层

pub mod entities;

pub use entities::*;
