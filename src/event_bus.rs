// 事件总线 - 向展示层推送整理进度
//
// 实现发布/订阅模式，自动化任务只管发布，不关心谁在监听
// 使用 tokio::sync::broadcast 实现高效的事件分发

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::automation::{RunOutcome, SkipReason};
use crate::models::Category;

/// 应用事件枚举 - 定义所有可能的整理事件
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrganizerEvent {
    // --- 任务事件 ---

    /// 整理任务开始
    RunStarted {
        run_id: Uuid,
        folder_count: usize,
    },

    /// 整理任务结束（完成、取消或失败）
    RunFinished {
        run_id: Uuid,
        outcome: RunOutcome,
    },

    // --- 文件夹事件 ---

    /// 文件夹创建手势已派发
    FolderCreated {
        category: Category,
        first_app: String,
        anchor_app: String,
    },

    /// 文件夹被跳过
    FolderSkipped {
        category: Category,
        reason: SkipReason,
    },

    /// 应用已拖入文件夹
    AppMoved {
        category: Category,
        app_name: String,
    },

    /// 找不到应用图标，已跳过
    AppSkipped {
        category: Category,
        app_name: String,
    },

    // --- 系统事件 ---

    /// 配置更新
    SettingsUpdated,

    /// 应用清单已刷新
    InventoryRefreshed {
        app_count: usize,
    },
}

/// 事件总线
///
/// 使用 broadcast channel 实现发布/订阅模式
/// 支持多个订阅者同时接收事件
pub struct EventBus {
    sender: broadcast::Sender<OrganizerEvent>,
}

impl EventBus {
    /// 创建新的事件总线
    ///
    /// # 参数
    /// - `capacity`: 事件缓冲区大小,建议 100-1000
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 发布事件
    ///
    /// 如果没有订阅者,事件会被丢弃(这是正常的)
    pub fn publish(&self, event: OrganizerEvent) {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                tracing::trace!("事件已发布，订阅者数量: {}", receiver_count);
            }
            Err(_) => {
                tracing::trace!("事件已发布但无订阅者");
            }
        }
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<OrganizerEvent> {
        self.sender.subscribe()
    }

    /// 获取当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
