// 测试用的屏幕与手势替身

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::gesture::GestureSink;
use super::sequence::AutomationSequence;
use super::AutomationAction;
use crate::models::{GestureStep, Rect};
use crate::screen::{UiNode, UiTreeProvider};

/// 固定内容的屏幕，可在测试中途替换
pub struct FakeScreen {
    root: Mutex<Option<UiNode>>,
    fail: bool,
    queries: AtomicUsize,
}

impl FakeScreen {
    pub fn new(root: Option<UiNode>) -> Self {
        Self {
            root: Mutex::new(root),
            fail: false,
            queries: AtomicUsize::new(0),
        }
    }

    /// 每次查询都返回错误
    pub fn broken() -> Self {
        Self {
            root: Mutex::new(None),
            fail: true,
            queries: AtomicUsize::new(0),
        }
    }

    /// 桌面：每个标签一个图标，横向排列
    pub fn launcher(labels: &[&str]) -> Self {
        Self::new(Some(launcher_root(labels)))
    }

    pub fn set_root(&self, root: Option<UiNode>) {
        *self.root.lock().unwrap() = root;
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl UiTreeProvider for FakeScreen {
    fn active_root(&self) -> Result<Option<UiNode>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("无障碍服务已断开"));
        }
        Ok(self.root.lock().unwrap().clone())
    }
}

/// 图标位置：第 index 个图标位于 (index * 200, 0) 起的 100x100 方块
pub fn icon_bounds(index: usize) -> Rect {
    let left = index as i32 * 200;
    Rect::new(left, 0, left + 100, 100)
}

pub fn launcher_root(labels: &[&str]) -> UiNode {
    UiNode::new(None, Rect::new(0, 0, 1080, 2400)).with_children(
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| UiNode::labeled(label, icon_bounds(index)))
            .collect(),
    )
}

/// 记录所有收到的手势
#[derive(Default)]
pub struct RecordingSink {
    gestures: Mutex<Vec<GestureStep>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            gestures: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn gestures(&self) -> Vec<GestureStep> {
        self.gestures.lock().unwrap().clone()
    }
}

impl GestureSink for RecordingSink {
    fn dispatch(&self, gesture: &GestureStep) -> Result<()> {
        if self.fail {
            return Err(anyhow!("手势派发不可用"));
        }
        self.gestures.lock().unwrap().push(*gesture);
        Ok(())
    }
}

/// 同步驱动步骤生成器，返回产出的全部动作
pub fn collect_actions(
    sequence: &mut AutomationSequence,
    screen: &dyn UiTreeProvider,
) -> Result<Vec<AutomationAction>> {
    let mut actions = Vec::new();
    while let Some(action) = sequence.next_action(screen)? {
        actions.push(action);
    }
    Ok(actions)
}

pub fn drags(actions: &[AutomationAction]) -> Vec<GestureStep> {
    actions
        .iter()
        .filter_map(|action| match action {
            AutomationAction::Drag(gesture) => Some(*gesture),
            AutomationAction::Wait(_) => None,
        })
        .collect()
}
