// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - inbox: 消息分析模块，处理分类、会话与统计
// - config: 配置模块，处理应用设置

pub mod config;
pub mod inbox;

pub use config::ConfigModule;
pub use inbox::InboxModule;
