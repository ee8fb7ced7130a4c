// 应用目录领域管理器
//
// 负责应用清单扫描、分类结果缓存和文件夹规划
// 包含 InventoryProvider、Classifier 和 FolderPlanner 三个核心组件

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::classifier::{Classifier, SystemAppPolicy};
use crate::error::{OrganizerError, Result};
use crate::event_bus::{EventBus, OrganizerEvent};
use crate::inventory::{filter_applications, scan_inventory, InventoryProvider};
use crate::models::{Application, Category, FolderPlan, OrganizingPreference, PlanManifest};
use crate::planner::{FolderPlanner, PlannerOptions};

/// 应用目录领域管理器 - 负责清单、分类和规划
#[derive(Clone)]
pub struct CatalogDomain {
    provider: Arc<dyn InventoryProvider>,
    applications: Arc<RwLock<Vec<Application>>>,
    classifier: Arc<RwLock<Classifier>>,
    planner: Arc<RwLock<FolderPlanner>>,
    event_bus: Arc<EventBus>,
}

impl CatalogDomain {
    /// 创建新的应用目录领域管理器
    pub fn new(
        provider: Arc<dyn InventoryProvider>,
        classifier: Classifier,
        planner_options: PlannerOptions,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            applications: Arc::new(RwLock::new(Vec::new())),
            classifier: Arc::new(RwLock::new(classifier)),
            planner: Arc::new(RwLock::new(FolderPlanner::new(planner_options))),
            event_bus,
        }
    }

    /// 重新扫描已安装应用，返回应用数量
    ///
    /// 扫描失败时保留上一次的结果
    pub async fn refresh(&self) -> Result<usize> {
        let classifier = *self.classifier.read().await;
        let applications = scan_inventory(self.provider.as_ref(), &classifier)
            .await
            .map_err(|e| {
                warn!("扫描应用清单失败: {:#}", e);
                OrganizerError::Inventory {
                    message: e.to_string(),
                }
            })?;

        let count = applications.len();
        *self.applications.write().await = applications;
        self.event_bus
            .publish(OrganizerEvent::InventoryRefreshed { app_count: count });
        Ok(count)
    }

    /// 当前缓存的全部应用
    pub async fn applications(&self) -> Vec<Application> {
        self.applications.read().await.clone()
    }

    /// 按分类和关键词筛选
    pub async fn filter(&self, category: Category, query: &str) -> Vec<Application> {
        let applications = self.applications.read().await;
        filter_applications(&applications, category, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// 为缺少图标的应用重新加载图标，返回成功加载的数量
    pub async fn reload_missing_icons(&self) -> usize {
        let mut applications = self.applications.write().await;
        let mut loaded = 0;
        for app in applications.iter_mut().filter(|app| app.icon.is_none()) {
            if app.reload_icon(self.provider.as_ref()).await {
                loaded += 1;
            }
        }
        loaded
    }

    /// 按偏好规划文件夹
    pub async fn plan(&self, preference: OrganizingPreference) -> FolderPlan {
        let applications = self.applications.read().await;
        let plan = self.planner.read().await.plan(&applications, preference);
        info!(
            "规划完成 ({}): {} 个文件夹",
            preference.display_name(),
            plan.len()
        );
        plan
    }

    /// 根据清单还原规划，清单中的包名按当前缓存解析
    pub async fn resolve_manifest(&self, manifest: &PlanManifest) -> FolderPlan {
        let applications = self.applications.read().await;
        FolderPlan::from_manifest(manifest, &applications)
    }

    /// 应用新的分类与规划参数，下一次扫描和规划生效
    pub async fn configure(&self, system_policy: SystemAppPolicy, planner_options: PlannerOptions) {
        *self.classifier.write().await = Classifier::new(system_policy);
        *self.planner.write().await = FolderPlanner::new(planner_options);
    }

    pub async fn planner_options(&self) -> PlannerOptions {
        self.planner.read().await.options()
    }
}
