//! 文件夹规划
//!
//! 按整理偏好把已分类的应用分组为文件夹，结果是输入的确定性函数

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::models::{Application, Category, Folder, FolderPlan, OrganizingPreference};

/// 应用命中多个偏好分类时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// 放入每个命中的文件夹
    #[default]
    Duplicate,
    /// 只放入偏好列表中排名最靠前的分类
    HighestPriority,
}

/// 规划参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerOptions {
    /// 文件夹最少应用数，低于此数的文件夹被丢弃
    pub min_group_size: usize,
    /// 多分类应用的处理策略
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            min_group_size: 1,
            duplicate_policy: DuplicatePolicy::Duplicate,
        }
    }
}

impl PlannerOptions {
    /// 确认文件夹模式：至少两个应用才能真正创建文件夹
    pub fn confirmed_folders() -> Self {
        Self {
            min_group_size: 2,
            ..Self::default()
        }
    }
}

/// 文件夹规划器
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderPlanner {
    options: PlannerOptions,
}

impl FolderPlanner {
    pub fn new(options: PlannerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> PlannerOptions {
        self.options
    }

    /// 将应用整理到文件夹
    pub fn plan(
        &self,
        applications: &[Application],
        preference: OrganizingPreference,
    ) -> FolderPlan {
        let preferred = preference.preferred_categories();
        let mut folder_map: BTreeMap<Category, Vec<&Application>> = BTreeMap::new();

        for app in applications {
            let targets = self.target_categories(app, preferred);

            if targets.is_empty() {
                folder_map.entry(Category::Other).or_default().push(app);
                continue;
            }

            for category in targets {
                folder_map.entry(category).or_default().push(app);
            }
        }

        let mut folders: Vec<Folder> = folder_map
            .into_iter()
            .map(|(category, apps)| Folder {
                category,
                apps: dedup_and_sort(apps),
            })
            .filter(|folder| {
                let keep =
                    !folder.apps.is_empty() && folder.apps.len() >= self.options.min_group_size;
                if !keep {
                    debug!(
                        "丢弃文件夹 {}: {} 个应用，少于 {}",
                        folder.category.display_name(),
                        folder.apps.len(),
                        self.options.min_group_size
                    );
                }
                keep
            })
            .collect();

        // BTreeMap 已按分类声明顺序排列，稳定排序保留该顺序作为平局规则
        folders.sort_by(|a, b| b.apps.len().cmp(&a.apps.len()));

        debug!(
            "规划完成（{}）：{} 个文件夹",
            preference.display_name(),
            folders.len()
        );

        FolderPlan::new(folders)
    }

    fn target_categories(&self, app: &Application, preferred: &[Category]) -> Vec<Category> {
        match self.options.duplicate_policy {
            DuplicatePolicy::Duplicate => app
                .categories
                .iter()
                .copied()
                .filter(|category| preferred.contains(category))
                .collect(),
            DuplicatePolicy::HighestPriority => preferred
                .iter()
                .copied()
                .find(|category| app.has_category(*category))
                .into_iter()
                .collect(),
        }
    }
}

fn dedup_and_sort(apps: Vec<&Application>) -> Vec<Application> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Application> = apps
        .into_iter()
        .filter(|app| seen.insert(app.identifier.as_str()))
        .cloned()
        .collect();

    unique.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    unique
}
