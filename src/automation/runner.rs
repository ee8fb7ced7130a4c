// 整理任务调度 - 在后台任务中驱动步骤生成器
//
// 每次整理只有一个后台任务，手势严格串行派发。
// 外层监督任务等待工作任务结束，把错误和崩溃都转换为失败结果，
// 无论如何都把状态恢复为空闲，不向宿主传播

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::gesture::{GestureExecutor, GestureSink};
use super::sequence::AutomationSequence;
use super::{AutomationAction, AutomationTimings, RunOutcome, RunReport};
use crate::actors::{AutomationRunState, RunStateHandle};
use crate::error::OrganizerError;
use crate::event_bus::{EventBus, OrganizerEvent};
use crate::models::FolderPlan;
use crate::screen::UiTreeProvider;

/// 驱动步骤生成器直到结束
///
/// 等待只发生在动作之间，取消标志由生成器在检查点读取
pub async fn drive_sequence(
    mut sequence: AutomationSequence,
    screen: Arc<dyn UiTreeProvider>,
    executor: Arc<GestureExecutor>,
    event_bus: Arc<EventBus>,
) -> Result<RunReport> {
    while let Some(action) = sequence.next_action(screen.as_ref())? {
        for event in sequence.drain_events() {
            event_bus.publish(event);
        }

        match action {
            AutomationAction::Wait(duration) => {
                if !duration.is_zero() {
                    sleep(duration).await;
                }
            }
            AutomationAction::Drag(gesture) => {
                executor.perform(&gesture)?;
                // 派发后按手势时长等待，保证两次手势不会重叠
                sleep(gesture.duration()).await;
            }
        }
    }

    for event in sequence.drain_events() {
        event_bus.publish(event);
    }

    Ok(sequence.into_report())
}

/// 整理服务 - 对外提供开始、停止和状态查询
///
/// 元素树和手势派发端如需在界面线程上访问，由宿主的实现自行切换线程
pub struct OrganizerService {
    run_state: RunStateHandle,
    screen: Arc<dyn UiTreeProvider>,
    executor: Arc<GestureExecutor>,
    timings: RwLock<AutomationTimings>,
    event_bus: Arc<EventBus>,
    worker: Mutex<Option<AbortHandle>>,
}

impl OrganizerService {
    /// 创建新的整理服务
    pub fn new(
        run_state: RunStateHandle,
        screen: Arc<dyn UiTreeProvider>,
        sink: Arc<dyn GestureSink>,
        timings: AutomationTimings,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            run_state,
            screen,
            executor: Arc::new(GestureExecutor::new(sink)),
            timings: RwLock::new(timings),
            event_bus,
            worker: Mutex::new(None),
        }
    }

    /// 更新时间参数，对下一次整理生效
    pub async fn configure(&self, timings: AutomationTimings) -> Result<(), OrganizerError> {
        timings.validate()?;
        *self.timings.write().await = timings;
        info!("整理时间参数已更新: {:?}", timings);
        Ok(())
    }

    pub async fn timings(&self) -> AutomationTimings {
        *self.timings.read().await
    }

    /// 开始整理
    ///
    /// 已有任务运行时拒绝并返回 `AlreadyRunning`，不会排队
    pub async fn start_organizing(&self, plan: FolderPlan) -> Result<Uuid, OrganizerError> {
        let folder_count = plan.len();
        let ticket = match self.run_state.begin(plan.clone()).await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("无法开始整理: {}", e);
                return Err(e);
            }
        };

        let run_id = ticket.run_id;
        let timings = self.timings().await;
        info!("开始整理任务 {}: {} 个文件夹", run_id, folder_count);
        self.event_bus.publish(OrganizerEvent::RunStarted {
            run_id,
            folder_count,
        });

        let sequence = AutomationSequence::new(plan, timings, ticket.cancel);
        let worker = tokio::spawn(drive_sequence(
            sequence,
            self.screen.clone(),
            self.executor.clone(),
            self.event_bus.clone(),
        ));

        if let Ok(mut slot) = self.worker.lock() {
            *slot = Some(worker.abort_handle());
        }

        let run_state = self.run_state.clone();
        let event_bus = self.event_bus.clone();
        tokio::spawn(async move {
            let outcome = match worker.await {
                Ok(Ok(report)) => RunOutcome::from_report(report),
                Ok(Err(e)) => {
                    error!("整理过程中出错: {:#}", e);
                    RunOutcome::Failed {
                        message: e.to_string(),
                    }
                }
                Err(e) if e.is_cancelled() => RunOutcome::Failed {
                    message: "整理任务被中止".to_string(),
                },
                Err(e) => {
                    error!("整理任务异常退出: {}", e);
                    RunOutcome::Failed {
                        message: format!("整理任务异常退出: {}", e),
                    }
                }
            };

            run_state.finish(run_id, outcome.clone()).await;
            event_bus.publish(OrganizerEvent::RunFinished { run_id, outcome });
        });

        Ok(run_id)
    }

    /// 停止整理，在下一个检查点生效
    pub async fn stop_organizing(&self) -> bool {
        let cancelled = self.run_state.cancel().await;
        if cancelled {
            info!("已请求停止整理");
        }
        cancelled
    }

    pub async fn is_running(&self) -> bool {
        self.run_state.get().await.is_running()
    }

    pub async fn state(&self) -> AutomationRunState {
        self.run_state.get().await
    }

    /// 宿主服务销毁：中止正在运行的任务并回到空闲
    pub async fn shutdown(&self) {
        self.run_state.reset().await;
        if let Ok(mut slot) = self.worker.lock() {
            if let Some(worker) = slot.take() {
                worker.abort();
            }
        }
        info!("整理服务已关闭");
    }
}
