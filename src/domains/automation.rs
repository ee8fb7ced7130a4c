// 自动化领域管理器
//
// 负责整理服务和任务状态Actor

use std::sync::Arc;

use crate::actors::RunStateHandle;
use crate::automation::OrganizerService;

/// 自动化领域管理器 - 负责执行整理与状态查询
#[derive(Clone)]
pub struct AutomationDomain {
    service: Arc<OrganizerService>,
    run_state: RunStateHandle,
}

impl AutomationDomain {
    /// 创建新的自动化领域管理器
    pub fn new(service: Arc<OrganizerService>, run_state: RunStateHandle) -> Self {
        Self { service, run_state }
    }

    /// 获取整理服务
    pub fn get_service(&self) -> &Arc<OrganizerService> {
        &self.service
    }

    /// 自动化服务是否可用
    pub async fn is_available(&self) -> bool {
        self.run_state.health_check().await
    }
}
