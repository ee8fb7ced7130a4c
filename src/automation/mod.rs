// 自动化模块 - 通过模拟拖动手势在桌面上创建文件夹
//
// sequence: 惰性的步骤生成器，每次产出一个等待或一个手势
// gesture:  手势构造与派发
// runner:   在后台任务中驱动步骤生成器，管理整理任务的生命周期

pub mod gesture;
pub mod runner;
pub mod sequence;

#[cfg(test)]
pub(crate) mod test_support;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{OrganizerError, Result};
use crate::models::{Category, GestureStep};

pub use gesture::{drag_gesture, GestureExecutor, GestureSink};
pub use runner::{drive_sequence, OrganizerService};
pub use sequence::AutomationSequence;

/// 步骤生成器产出的单个动作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationAction {
    /// 等待桌面动画完成
    Wait(Duration),
    /// 派发一次拖动手势
    Drag(GestureStep),
}

/// 协作式取消标志，只在检查点生效
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 自动化时间参数（毫秒）
///
/// 这些数值来自实际桌面上的经验值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationTimings {
    /// 开始前等待用户回到桌面
    pub initial_settle_ms: u64,
    /// 创建文件夹后等待动画完成
    pub folder_settle_ms: u64,
    /// 每个应用移入文件夹后的等待
    pub insert_delay_ms: u64,
    /// 文件夹之间的等待
    pub inter_folder_delay_ms: u64,
    /// 单次拖动手势时长
    pub gesture_duration_ms: u64,
    /// 图标查找失败后的重试次数
    pub lookup_retries: u32,
    /// 重试前的等待
    pub retry_delay_ms: u64,
}

impl Default for AutomationTimings {
    fn default() -> Self {
        Self {
            initial_settle_ms: 2000,
            folder_settle_ms: 1500,
            insert_delay_ms: 800,
            inter_folder_delay_ms: 1000,
            gesture_duration_ms: 1000,
            lookup_retries: 1,
            retry_delay_ms: 500,
        }
    }
}

impl AutomationTimings {
    /// 所有等待都为零、不重试（用于测试和预演）
    pub fn immediate() -> Self {
        Self {
            initial_settle_ms: 0,
            folder_settle_ms: 0,
            insert_delay_ms: 0,
            inter_folder_delay_ms: 0,
            gesture_duration_ms: 1,
            lookup_retries: 0,
            retry_delay_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gesture_duration_ms == 0 {
            return Err(OrganizerError::invalid_settings("手势时长必须大于0"));
        }
        if self.lookup_retries > 5 {
            return Err(OrganizerError::invalid_settings("重试次数不能超过5"));
        }
        Ok(())
    }

    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    pub fn folder_settle(&self) -> Duration {
        Duration::from_millis(self.folder_settle_ms)
    }

    pub fn insert_delay(&self) -> Duration {
        Duration::from_millis(self.insert_delay_ms)
    }

    pub fn inter_folder_delay(&self) -> Duration {
        Duration::from_millis(self.inter_folder_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// 文件夹被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// 文件夹没有应用
    EmptyFolder,
    /// 只有一个应用，无需创建
    SingleApp,
    /// 无法获取屏幕根节点
    RootUnavailable,
    /// 找不到第一个应用的图标
    IconNotFound { label: String },
    /// 找不到第二个应用（锚点）的图标
    AnchorNotFound { label: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFolder => write!(f, "文件夹为空"),
            Self::SingleApp => write!(f, "只有一个应用"),
            Self::RootUnavailable => write!(f, "屏幕根节点不可用"),
            Self::IconNotFound { label } => write!(f, "未找到图标: {}", label),
            Self::AnchorNotFound { label } => write!(f, "未找到锚点图标: {}", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFolder {
    pub category: Category,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedApp {
    pub category: Category,
    pub app_name: String,
}

/// 一次整理的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RunReport {
    /// 已创建的文件夹数
    pub folders_created: usize,
    /// 已放入文件夹的应用数（包括创建文件夹的两个应用）
    pub apps_moved: usize,
    /// 已派发的手势数
    pub gestures: usize,
    pub skipped_folders: Vec<SkippedFolder>,
    pub skipped_apps: Vec<SkippedApp>,
    /// 是否因取消而提前结束
    pub cancelled: bool,
}

/// 整理任务的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { report: RunReport },
    Cancelled { report: RunReport },
    Failed { message: String },
}

impl RunOutcome {
    pub fn from_report(report: RunReport) -> Self {
        if report.cancelled {
            Self::Cancelled { report }
        } else {
            Self::Completed { report }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}
