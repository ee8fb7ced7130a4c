// 图标定位 - 在元素树中按标签查找应用图标

use super::UiNode;
use crate::models::Rect;

/// 查找文本与标签相同（忽略大小写）的第一个元素，返回其屏幕边界
///
/// 只做完全匹配，不做子串匹配，避免命中包含该标签的其他元素
pub fn find_icon(root: &UiNode, label: &str) -> Option<Rect> {
    let target = label.to_lowercase();

    root.walk()
        .find(|node| {
            node.text
                .as_deref()
                .is_some_and(|text| text == label || text.to_lowercase() == target)
        })
        .map(|node| node.bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> UiNode {
        UiNode::new(None, Rect::new(0, 0, 1080, 2400)).with_children(vec![
            UiNode::labeled("WeChat Work", Rect::new(0, 0, 200, 200)),
            UiNode::new(None, Rect::new(0, 200, 1080, 400)).with_children(vec![
                UiNode::labeled("wechat", Rect::new(200, 200, 400, 400)),
                UiNode::labeled("WeChat", Rect::new(400, 200, 600, 400)),
            ]),
            UiNode::labeled("淘宝", Rect::new(600, 200, 800, 400)),
        ])
    }

    #[test]
    fn test_find_icon_exact_case_insensitive() {
        let root = launcher();
        // 第一个匹配项胜出，不会命中 "WeChat Work"
        assert_eq!(find_icon(&root, "WeChat"), Some(Rect::new(200, 200, 400, 400)));
        assert_eq!(find_icon(&root, "淘宝"), Some(Rect::new(600, 200, 800, 400)));
    }

    #[test]
    fn test_find_icon_not_found() {
        let root = launcher();
        assert_eq!(find_icon(&root, "Chat"), None);
        assert_eq!(find_icon(&root, "Taobao"), None);
    }
}
