// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

pub mod category;

pub use category::{Category, OrganizingPreference, FALLBACK_GLYPH};

/// 应用图标句柄（不透明，由平台按需重新加载）
#[derive(Clone, PartialEq, Eq)]
pub struct IconHandle(Arc<[u8]>);

impl IconHandle {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for IconHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IconHandle({} bytes)", self.0.len())
    }
}

/// 平台清单返回的原始应用条目
#[derive(Debug, Clone)]
pub struct InstalledApp {
    /// 包名
    pub identifier: String,
    /// 显示名称
    pub display_name: String,
    /// 图标
    pub icon: Option<IconHandle>,
}

/// 已分类的应用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// 包名（全局唯一）
    pub identifier: String,
    /// 显示名称
    pub display_name: String,
    /// 图标，不参与序列化
    #[serde(skip)]
    pub icon: Option<IconHandle>,
    /// 分类集合（按分类声明顺序迭代）
    pub categories: BTreeSet<Category>,
}

impl Application {
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        categories: BTreeSet<Category>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            icon: None,
            categories,
        }
    }

    pub fn with_icon(mut self, icon: Option<IconHandle>) -> Self {
        self.icon = icon;
        self
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// 屏幕坐标点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 屏幕坐标矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// 矩形中心点，作为手势锚点
    pub fn center(&self) -> Point {
        Point {
            x: (self.left as f32 + self.right as f32) / 2.0,
            y: (self.top as f32 + self.bottom as f32) / 2.0,
        }
    }
}

/// 单次拖动手势
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureStep {
    pub start: Point,
    pub end: Point,
    pub duration_ms: u64,
}

impl GestureStep {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// 文件夹：一个分类及其中的应用
///
/// 应用列表不含重复包名，按显示名称排序，且不会为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub category: Category,
    pub apps: Vec<Application>,
}

impl Folder {
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn display_name(&self) -> &'static str {
        self.category.display_name()
    }
}

/// 一次规划的完整结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct FolderPlan {
    pub folders: Vec<Folder>,
}

/// 规划概要（用于预览提示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub folder_count: usize,
    /// 所有文件夹中的应用条目数（同一应用出现在多个文件夹时重复计数）
    pub app_count: usize,
}

impl FolderPlan {
    pub fn new(folders: Vec<Folder>) -> Self {
        Self { folders }
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Folder> {
        self.folders.iter()
    }

    pub fn folder(&self, category: Category) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.category == category)
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            folder_count: self.folders.len(),
            app_count: self.folders.iter().map(Folder::len).sum(),
        }
    }

    /// 转换为可传递的清单（仅包含分类名和包名）
    pub fn to_manifest(&self) -> PlanManifest {
        PlanManifest {
            folders: self
                .folders
                .iter()
                .map(|folder| FolderManifest {
                    category: folder.category.name().to_string(),
                    apps: folder
                        .apps
                        .iter()
                        .map(|app| app.identifier.clone())
                        .collect(),
                })
                .collect(),
        }
    }

    /// 根据清单和当前应用清单重建规划
    ///
    /// 无法识别的分类归为“其他”，找不到的包名被丢弃，解析后为空的文件夹被丢弃
    pub fn from_manifest(manifest: &PlanManifest, inventory: &[Application]) -> FolderPlan {
        let by_identifier: HashMap<&str, &Application> = inventory
            .iter()
            .map(|app| (app.identifier.as_str(), app))
            .collect();

        let folders = manifest
            .folders
            .iter()
            .filter_map(|entry| {
                let mut apps: Vec<Application> = Vec::with_capacity(entry.apps.len());
                for identifier in &entry.apps {
                    let Some(app) = by_identifier.get(identifier.as_str()) else {
                        continue;
                    };
                    if apps.iter().any(|existing| existing.identifier == app.identifier) {
                        continue;
                    }
                    apps.push((*app).clone());
                }

                if apps.is_empty() {
                    return None;
                }

                Some(Folder {
                    category: Category::from_name(&entry.category),
                    apps,
                })
            })
            .collect();

        FolderPlan { folders }
    }
}

impl<'a> IntoIterator for &'a FolderPlan {
    type Item = &'a Folder;
    type IntoIter = std::slice::Iter<'a, Folder>;

    fn into_iter(self) -> Self::IntoIter {
        self.folders.iter()
    }
}

/// 规划清单 - 在预览界面和自动化服务之间传递
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanManifest {
    pub folders: Vec<FolderManifest>,
}

/// 单个文件夹的清单条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderManifest {
    /// 分类枚举名称
    pub category: String,
    /// 包名列表
    pub apps: Vec<String>,
}
