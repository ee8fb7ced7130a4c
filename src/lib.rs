// 应用整理引擎 - 应用分类与桌面文件夹自动化主库

// 声明模块
pub mod actors;
pub mod app;
pub mod automation;
pub mod classifier;
pub mod commands;
pub mod domains;
pub mod error;
pub mod event_bus;
pub mod inventory;
pub mod logger;
pub mod models;
pub mod planner;
pub mod screen;
pub mod settings;

use std::sync::Arc;

use domains::{AutomationDomain, CatalogDomain};
use event_bus::EventBus;
use settings::SettingsManager;

pub use app::{bootstrap, init_logging, shutdown, HostBindings};
pub use error::{OrganizerError, Result};

/// 引擎状态（按领域分组）
///
/// - 目录领域：负责应用清单、分类和规划
/// - 自动化领域：负责整理任务的执行和状态
/// - 设置管理：持久化配置
/// - 事件总线：向展示层推送进度
#[derive(Clone)]
pub struct OrganizerState {
    /// 应用目录领域管理器
    pub catalog_domain: Arc<CatalogDomain>,
    /// 自动化领域管理器
    pub automation_domain: Arc<AutomationDomain>,
    /// 设置管理器
    pub settings: Arc<SettingsManager>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}
