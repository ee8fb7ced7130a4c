// 手势执行器 - 构造并派发拖动手势
//
// 派发即返回，不等待桌面确认；调用方按手势时长等待作为完成的近似

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::models::{GestureStep, Point};

/// 平台手势派发端
pub trait GestureSink: Send + Sync {
    /// 派发一次拖动，`Err` 表示派发端已不可用
    fn dispatch(&self, gesture: &GestureStep) -> Result<()>;
}

/// 构造从起点到终点的拖动
pub fn drag_gesture(start: Point, end: Point, duration_ms: u64) -> GestureStep {
    GestureStep {
        start,
        end,
        duration_ms,
    }
}

/// 手势执行器
pub struct GestureExecutor {
    sink: Arc<dyn GestureSink>,
    dispatched: AtomicU64,
}

impl GestureExecutor {
    pub fn new(sink: Arc<dyn GestureSink>) -> Self {
        Self {
            sink,
            dispatched: AtomicU64::new(0),
        }
    }

    /// 派发手势
    pub fn perform(&self, gesture: &GestureStep) -> Result<()> {
        self.sink.dispatch(gesture)?;
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        debug!(
            "执行拖动手势: ({}, {}) -> ({}, {}), {}ms",
            gesture.start.x, gesture.start.y, gesture.end.x, gesture.end.y, gesture.duration_ms
        );
        Ok(())
    }

    /// 已派发的手势总数
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}
