//! 整理任务控制命令
//!
//! 提供整理任务的开始、停止和状态查询接口

use tracing::info;
use uuid::Uuid;

use crate::actors::AutomationRunState;
use crate::error::Result;
use crate::models::PlanManifest;
use crate::OrganizerState;

/// 按预览中确认的清单开始整理
///
/// 清单中的包名按当前应用缓存解析，已卸载的应用被丢弃
pub async fn start_organizing(state: &OrganizerState, manifest: PlanManifest) -> Result<Uuid> {
    let plan = state.catalog_domain.resolve_manifest(&manifest).await;
    info!(
        "收到整理请求: 清单 {} 个文件夹，解析后 {} 个",
        manifest.folders.len(),
        plan.len()
    );

    state
        .automation_domain
        .get_service()
        .start_organizing(plan)
        .await
}

/// 停止整理，返回是否有任务被停止
pub async fn stop_organizing(state: &OrganizerState) -> bool {
    state.automation_domain.get_service().stop_organizing().await
}

/// 获取整理任务状态
pub async fn get_run_state(state: &OrganizerState) -> AutomationRunState {
    state.automation_domain.get_service().state().await
}

/// 自动化服务是否可用
pub async fn is_automation_available(state: &OrganizerState) -> bool {
    state.automation_domain.is_available().await
}
