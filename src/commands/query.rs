//! 应用清单与规划查询命令
//!
//! 提供各类查询接口，包括：
//! - 应用清单刷新和筛选
//! - 分类与偏好列表
//! - 文件夹规划预览

use serde::Serialize;

use crate::error::Result;
use crate::models::{Application, Category, OrganizingPreference, PlanManifest, PlanSummary};
use crate::OrganizerState;

/// 分类选项（筛选标签）
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub category: Category,
    pub display_name: &'static str,
    pub glyph: &'static str,
}

/// 偏好选项
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceOption {
    pub preference: OrganizingPreference,
    pub display_name: &'static str,
    pub description: &'static str,
}

/// 列表中的单个应用
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationEntry {
    #[serde(flatten)]
    pub application: Application,
    /// 分类标签，不含“全部”和“其他”
    pub badges: Vec<Category>,
}

/// 预览中的单个文件夹
#[derive(Debug, Clone, Serialize)]
pub struct FolderPreview {
    pub category: Category,
    pub display_name: &'static str,
    pub glyph: &'static str,
    pub app_names: Vec<String>,
}

/// 规划预览
#[derive(Debug, Clone, Serialize)]
pub struct PlanPreview {
    pub preference: OrganizingPreference,
    pub summary: PlanSummary,
    pub folders: Vec<FolderPreview>,
    /// 确认后原样传回 `start_organizing`
    pub manifest: PlanManifest,
}

/// 重新扫描已安装应用
pub async fn refresh_applications(state: &OrganizerState) -> Result<usize> {
    state.catalog_domain.refresh().await
}

/// 按分类和关键词列出应用
pub async fn list_applications(
    state: &OrganizerState,
    category: Category,
    query: Option<String>,
) -> Vec<ApplicationEntry> {
    state
        .catalog_domain
        .filter(category, query.as_deref().unwrap_or(""))
        .await
        .into_iter()
        .map(|application| ApplicationEntry {
            badges: application.badges().collect(),
            application,
        })
        .collect()
}

/// 获取筛选用的分类列表（包括“全部”）
pub fn list_categories() -> Vec<CategoryOption> {
    Category::ALL_VARIANTS
        .iter()
        .map(|category| CategoryOption {
            category: *category,
            display_name: category.display_name(),
            glyph: category.glyph(),
        })
        .collect()
}

/// 获取整理偏好列表
pub fn list_preferences() -> Vec<PreferenceOption> {
    OrganizingPreference::ALL_VARIANTS
        .iter()
        .map(|preference| PreferenceOption {
            preference: *preference,
            display_name: preference.display_name(),
            description: preference.description(),
        })
        .collect()
}

/// 预览文件夹规划
///
/// # 参数
/// * `preference` - 整理偏好，未指定时使用配置中的默认偏好
pub async fn preview_plan(
    state: &OrganizerState,
    preference: Option<OrganizingPreference>,
) -> PlanPreview {
    let preference = match preference {
        Some(preference) => preference,
        None => state.settings.get().await.default_preference,
    };

    let plan = state.catalog_domain.plan(preference).await;
    PlanPreview {
        preference,
        summary: plan.summary(),
        folders: plan
            .iter()
            .map(|folder| FolderPreview {
                category: folder.category,
                display_name: folder.display_name(),
                glyph: folder.category.glyph(),
                app_names: folder.apps.iter().map(|app| app.display_name.clone()).collect(),
            })
            .collect(),
        manifest: plan.to_manifest(),
    }
}
