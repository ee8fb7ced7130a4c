//! 宿主命令模块
//!
//! 提供宿主（界面层）调用的所有命令接口，按功能分组：
//! - query: 应用清单与规划预览
//! - config: 配置管理命令
//! - control: 整理任务控制命令

pub mod config;
pub mod control;
pub mod query;

// 重新导出所有命令
pub use config::*;
pub use control::*;
pub use query::*;
