//! 配置管理命令
//!
//! 提供整理配置的读取和更新接口，更新后立即应用到各领域

use tracing::info;

use crate::error::Result;
use crate::event_bus::OrganizerEvent;
use crate::settings::{PersistedSettings, SettingsUpdate};
use crate::OrganizerState;

/// 获取配置
pub async fn get_settings(state: &OrganizerState) -> PersistedSettings {
    state.settings.get().await
}

/// 更新配置
pub async fn update_settings(
    state: &OrganizerState,
    update: SettingsUpdate,
) -> Result<PersistedSettings> {
    let updated = state.settings.update(update).await?;

    state
        .automation_domain
        .get_service()
        .configure(updated.automation)
        .await?;
    state
        .catalog_domain
        .configure(updated.system_app_policy, updated.planner)
        .await;

    info!("配置已更新: {:?}", updated);
    state.event_bus.publish(OrganizerEvent::SettingsUpdated);
    Ok(updated)
}
