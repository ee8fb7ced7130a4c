// Run State Actor - 使用Actor模式管理整理任务状态
//
// 同一时间只允许一个整理任务运行；开始、取消、结束都通过消息串行处理

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::automation::{CancellationFlag, RunOutcome};
use crate::error::OrganizerError;
use crate::models::FolderPlan;

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// 已请求取消，等待下一个检查点
    Cancelling,
}

/// 整理任务状态快照
#[derive(Debug, Clone, Serialize, Default)]
pub struct AutomationRunState {
    pub status: RunStatus,
    pub run_id: Option<Uuid>,
    pub active_plan: Option<FolderPlan>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<RunOutcome>,
}

impl AutomationRunState {
    pub fn is_running(&self) -> bool {
        self.status != RunStatus::Idle
    }
}

/// 开始任务成功后返回的凭据
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub run_id: Uuid,
    pub cancel: CancellationFlag,
}

/// 任务状态命令
pub enum RunStateCommand {
    /// 尝试开始新任务
    Begin {
        plan: FolderPlan,
        reply: oneshot::Sender<Result<RunTicket, OrganizerError>>,
    },

    /// 请求取消当前任务
    Cancel {
        reply: oneshot::Sender<bool>,
    },

    /// 任务结束
    Finish {
        run_id: Uuid,
        outcome: RunOutcome,
        reply: oneshot::Sender<()>,
    },

    /// 强制回到空闲（宿主服务销毁时）
    Reset {
        reply: oneshot::Sender<()>,
    },

    /// 获取状态
    Get {
        reply: oneshot::Sender<AutomationRunState>,
    },
}

/// 任务状态Actor
pub struct RunStateActor {
    receiver: mpsc::Receiver<RunStateCommand>,
    state: AutomationRunState,
    cancel: Option<CancellationFlag>,
}

impl RunStateActor {
    /// 创建新的Actor
    pub fn new() -> (Self, RunStateHandle) {
        let (sender, receiver) = mpsc::channel(16);
        let actor = Self {
            receiver,
            state: AutomationRunState::default(),
            cancel: None,
        };
        let handle = RunStateHandle { sender };
        (actor, handle)
    }

    /// 运行Actor
    pub async fn run(mut self) {
        tracing::info!("Run State Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RunStateCommand::Begin { plan, reply } => {
                    let _ = reply.send(self.begin(plan));
                }

                RunStateCommand::Cancel { reply } => {
                    let _ = reply.send(self.request_cancel());
                }

                RunStateCommand::Finish {
                    run_id,
                    outcome,
                    reply,
                } => {
                    if self.state.run_id == Some(run_id) {
                        tracing::info!("整理任务 {} 已结束: {:?}", run_id, outcome);
                        self.clear(Some(outcome));
                    } else {
                        tracing::warn!("忽略过期任务的结束通知: {}", run_id);
                    }
                    let _ = reply.send(());
                }

                RunStateCommand::Reset { reply } => {
                    if let Some(cancel) = &self.cancel {
                        cancel.cancel();
                    }
                    self.clear(None);
                    let _ = reply.send(());
                }

                RunStateCommand::Get { reply } => {
                    let _ = reply.send(self.state.clone());
                }
            }
        }

        tracing::info!("Run State Actor 已停止");
    }

    fn begin(&mut self, plan: FolderPlan) -> Result<RunTicket, OrganizerError> {
        if self.state.is_running() {
            tracing::warn!("已有整理任务在运行，忽略新的请求");
            return Err(OrganizerError::AlreadyRunning);
        }

        let ticket = RunTicket {
            run_id: Uuid::new_v4(),
            cancel: CancellationFlag::new(),
        };

        self.state.status = RunStatus::Running;
        self.state.run_id = Some(ticket.run_id);
        self.state.active_plan = Some(plan);
        self.state.started_at = Some(Utc::now());
        self.cancel = Some(ticket.cancel.clone());

        Ok(ticket)
    }

    fn request_cancel(&mut self) -> bool {
        match (&self.state.status, &self.cancel) {
            (RunStatus::Running, Some(cancel)) => {
                cancel.cancel();
                self.state.status = RunStatus::Cancelling;
                true
            }
            (RunStatus::Cancelling, _) => true,
            _ => false,
        }
    }

    fn clear(&mut self, outcome: Option<RunOutcome>) {
        self.state.status = RunStatus::Idle;
        self.state.run_id = None;
        self.state.active_plan = None;
        self.state.started_at = None;
        if outcome.is_some() {
            self.state.last_outcome = outcome;
        }
        self.cancel = None;
    }
}

/// 任务状态Handle
#[derive(Clone)]
pub struct RunStateHandle {
    sender: mpsc::Sender<RunStateCommand>,
}

impl RunStateHandle {
    /// 尝试开始任务
    pub async fn begin(&self, plan: FolderPlan) -> Result<RunTicket, OrganizerError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RunStateCommand::Begin { plan, reply })
            .await
            .map_err(|_| OrganizerError::ServiceUnavailable)?;
        rx.await.map_err(|_| OrganizerError::ServiceUnavailable)?
    }

    /// 请求取消，返回是否有任务被取消
    pub async fn cancel(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.sender.send(RunStateCommand::Cancel { reply }).await.is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// 通知任务结束，返回时状态已更新
    pub async fn finish(&self, run_id: Uuid, outcome: RunOutcome) {
        let (reply, rx) = oneshot::channel();
        let command = RunStateCommand::Finish {
            run_id,
            outcome,
            reply,
        };
        if self.sender.send(command).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// 强制回到空闲，返回时取消标志已设置
    pub async fn reset(&self) {
        let (reply, rx) = oneshot::channel();
        if self.sender.send(RunStateCommand::Reset { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// 获取状态
    pub async fn get(&self) -> AutomationRunState {
        let (reply, rx) = oneshot::channel();
        self.sender.send(RunStateCommand::Get { reply }).await.ok();
        rx.await.unwrap_or_default()
    }

    /// 健康检查：Actor是否仍在响应
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.sender.send(RunStateCommand::Get { reply }).await.is_err() {
            return false;
        }
        tokio::time::timeout(std::time::Duration::from_secs(1), rx)
            .await
            .map(|result| result.is_ok())
            .unwrap_or(false)
    }
}
