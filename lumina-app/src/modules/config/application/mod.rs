// Config Application Layer
//
// 应用层实现配置查询处理器

pub mod queries;

pub use queries::*;
