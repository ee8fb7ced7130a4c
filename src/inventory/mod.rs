//! 应用清单
//!
//! 从平台读取已安装应用，排除系统核心应用后逐个分类，
//! 以及展示层用到的按分类、关键词筛选

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::models::{Application, Category, IconHandle, InstalledApp};

#[cfg(test)]
pub(crate) mod test_support;

/// 平台应用清单接口
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// 列出所有已安装应用
    async fn installed_applications(&self) -> Result<Vec<InstalledApp>>;

    /// 按包名重新加载图标，应用已卸载时返回 None
    async fn load_icon(&self, identifier: &str) -> Option<IconHandle>;
}

/// 扫描并分类已安装应用，结果按显示名称排序
pub async fn scan_inventory(
    provider: &dyn InventoryProvider,
    classifier: &Classifier,
) -> Result<Vec<Application>> {
    let installed = provider.installed_applications().await?;
    info!("获取到的应用数量: {}", installed.len());

    let mut applications = Vec::with_capacity(installed.len());
    for entry in installed {
        if entry.identifier.is_empty() {
            warn!("跳过没有包名的应用: {}", entry.display_name);
            continue;
        }

        if classifier.is_system_application(&entry.identifier) {
            debug!("跳过系统应用: {}", entry.identifier);
            continue;
        }

        let categories = classifier.classify(&entry.identifier, &entry.display_name);
        debug!(
            "{} ({}) 分类结果: {:?}",
            entry.display_name, entry.identifier, categories
        );

        applications.push(
            Application::new(entry.identifier, entry.display_name, categories)
                .with_icon(entry.icon),
        );
    }

    applications.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    info!("过滤后的应用数量: {}", applications.len());
    Ok(applications)
}

impl Application {
    /// 从平台重新加载图标（清单在序列化传递后图标会丢失）
    pub async fn reload_icon(&mut self, provider: &dyn InventoryProvider) -> bool {
        self.icon = provider.load_icon(&self.identifier).await;
        self.icon.is_some()
    }

    /// 展示用的分类标签，不含“全部”和“其他”
    pub fn badges(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories
            .iter()
            .copied()
            .filter(|category| !matches!(category, Category::All | Category::Other))
    }
}

/// 按分类和关键词筛选应用
///
/// `Category::All` 不按分类过滤；关键词为空时不按关键词过滤，
/// 否则对名称或包名做大小写不敏感的子串匹配
pub fn filter_applications<'a>(
    applications: &'a [Application],
    category: Category,
    query: &str,
) -> Vec<&'a Application> {
    let query = query.trim().to_lowercase();

    applications
        .iter()
        .filter(|app| category == Category::All || app.has_category(category))
        .filter(|app| {
            query.is_empty()
                || app.display_name.to_lowercase().contains(&query)
                || app.identifier.to_lowercase().contains(&query)
        })
        .collect()
}
