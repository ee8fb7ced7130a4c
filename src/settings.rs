// 配置管理 - 持久化整理参数

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::automation::AutomationTimings;
use crate::classifier::SystemAppPolicy;
use crate::error::{OrganizerError, Result};
use crate::models::OrganizingPreference;
use crate::planner::PlannerOptions;

/// 持久化的配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistedSettings {
    pub automation: AutomationTimings,
    pub planner: PlannerOptions,
    pub system_app_policy: SystemAppPolicy,
    pub default_preference: OrganizingPreference,
}

impl PersistedSettings {
    pub fn validate(&self) -> Result<()> {
        if self.planner.min_group_size == 0 {
            return Err(OrganizerError::invalid_settings("文件夹最少应用数必须大于0"));
        }
        self.automation.validate()
    }
}

/// 配置的部分更新
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub automation: Option<AutomationTimings>,
    pub planner: Option<PlannerOptions>,
    pub system_app_policy: Option<SystemAppPolicy>,
    pub default_preference: Option<OrganizingPreference>,
}

pub struct SettingsManager {
    path: PathBuf,
    data: RwLock<PersistedSettings>,
}

impl SettingsManager {
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                match serde_json::from_slice::<PersistedSettings>(&bytes) {
                    Ok(settings) if settings.validate().is_ok() => settings,
                    _ => {
                        warn!("配置文件无效，使用默认配置: {:?}", path);
                        PersistedSettings::default()
                    }
                }
            }
            _ => {
                let default = PersistedSettings::default();
                let json = serde_json::to_string_pretty(&default)?;
                tokio::fs::write(&path, json).await?;
                default
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(initial),
        })
    }

    pub async fn get(&self) -> PersistedSettings {
        self.data.read().await.clone()
    }

    /// 合并更新并保存；校验失败时不修改任何内容
    pub async fn update(&self, update: SettingsUpdate) -> Result<PersistedSettings> {
        let mut settings = self.data.write().await;
        let mut next = settings.clone();

        if let Some(automation) = update.automation {
            next.automation = automation;
        }
        if let Some(planner) = update.planner {
            next.planner = planner;
        }
        if let Some(policy) = update.system_app_policy {
            next.system_app_policy = policy;
        }
        if let Some(preference) = update.default_preference {
            next.default_preference = preference;
        }

        next.validate()?;
        self.save(&next).await?;
        *settings = next;
        Ok(settings.clone())
    }

    async fn save(&self, settings: &PersistedSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
