//! 引擎初始化和关闭
//!
//! 负责整理引擎的完整启动流程，包括：
//! - 日志系统初始化
//! - 配置加载
//! - Actor 系统启动
//! - 各领域模块组装
//! - 首次应用清单扫描

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::actors::RunStateActor;
use crate::automation::{GestureSink, OrganizerService};
use crate::classifier::Classifier;
use crate::domains::{AutomationDomain, CatalogDomain};
use crate::event_bus::EventBus;
use crate::inventory::InventoryProvider;
use crate::logger::{self, LogBroadcaster};
use crate::screen::UiTreeProvider;
use crate::settings::SettingsManager;
use crate::OrganizerState;

/// 宿主平台提供的能力
pub struct HostBindings {
    /// 已安装应用清单
    pub inventory: Arc<dyn InventoryProvider>,
    /// 当前桌面的元素树
    pub screen: Arc<dyn UiTreeProvider>,
    /// 手势派发
    pub gestures: Arc<dyn GestureSink>,
}

/// 初始化日志系统，返回推送器供展示层订阅
///
/// 只能在进程中调用一次
pub fn init_logging(log_dir: Option<PathBuf>) -> Result<Arc<LogBroadcaster>> {
    let log_broadcaster = Arc::new(LogBroadcaster::default());
    logger::init_with_broadcaster(log_broadcaster.clone(), log_dir)
        .context("日志系统初始化失败")?;
    Ok(log_broadcaster)
}

/// 组装整理引擎
///
/// 必须在 tokio 运行时中调用。首次扫描失败不会阻止启动，
/// 展示层可以稍后调用 `refresh_applications` 重试
pub async fn bootstrap(data_dir: &Path, host: HostBindings) -> Result<OrganizerState> {
    info!("初始化应用整理引擎...");

    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("无法创建数据目录: {:?}", data_dir))?;

    let settings = Arc::new(
        SettingsManager::new(data_dir.join("config.json"))
            .await
            .context("设置管理器初始化失败")?,
    );
    let initial = settings.get().await;
    info!("已加载配置: {:?}", initial);

    // 创建事件总线（容量1000,足够缓冲）
    let event_bus = Arc::new(EventBus::new(1000));

    let (run_state_actor, run_state) = RunStateActor::new();
    tokio::spawn(run_state_actor.run());

    // ==================== 组装领域管理器 ====================

    let service = Arc::new(OrganizerService::new(
        run_state.clone(),
        host.screen,
        host.gestures,
        initial.automation,
        event_bus.clone(),
    ));
    let automation_domain = Arc::new(AutomationDomain::new(service, run_state));

    let catalog_domain = Arc::new(CatalogDomain::new(
        host.inventory,
        Classifier::new(initial.system_app_policy),
        initial.planner,
        event_bus.clone(),
    ));

    info!("领域管理器已初始化完成");

    match catalog_domain.refresh().await {
        Ok(count) => info!("首次扫描完成: {} 个应用", count),
        Err(e) => warn!("首次扫描失败，稍后可重试: {}", e),
    }

    Ok(OrganizerState {
        catalog_domain,
        automation_domain,
        settings,
        event_bus,
    })
}

/// 宿主服务销毁时调用：中止正在运行的整理任务
pub async fn shutdown(state: &OrganizerState) {
    state.automation_domain.get_service().shutdown().await;
    info!("应用整理引擎已关闭");
}
