// 屏幕模块 - 外部提供的界面元素树快照及图标定位

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::Rect;

pub mod locator;

pub use locator::find_icon;

/// 界面元素树节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UiNode {
    /// 无障碍文本（图标标签）
    #[serde(default)]
    pub text: Option<String>,
    /// 屏幕坐标中的边界
    #[serde(default)]
    pub bounds: Rect,
    /// 子节点
    #[serde(default)]
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn new(text: Option<&str>, bounds: Rect) -> Self {
        Self {
            text: text.map(str::to_string),
            bounds,
            children: Vec::new(),
        }
    }

    /// 带标签的叶子节点
    pub fn labeled(text: &str, bounds: Rect) -> Self {
        Self::new(Some(text), bounds)
    }

    pub fn with_children(mut self, children: Vec<UiNode>) -> Self {
        self.children = children;
        self
    }

    /// 前序遍历所有节点
    pub fn walk(&self) -> UiNodeWalk<'_> {
        UiNodeWalk { stack: vec![self] }
    }
}

/// 前序遍历迭代器
pub struct UiNodeWalk<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for UiNodeWalk<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// 界面元素树提供者
///
/// 每次调用都应返回当前屏幕的最新快照。
/// `Ok(None)` 表示当前没有可用的根节点（例如桌面不在前台），
/// `Err` 表示无法访问元素树
pub trait UiTreeProvider: Send + Sync {
    fn active_root(&self) -> Result<Option<UiNode>>;
}
