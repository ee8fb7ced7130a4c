// 整理步骤生成器
//
// 把一份文件夹规划展开为有限的动作序列：等待 / 拖动。
// 调用方每次取一个动作，执行完（包括等待）再取下一个。
// 屏幕快照只在取动作时获取，从不跨越等待缓存。
// 取消标志在每个文件夹开始前和每个应用移入前检查

use anyhow::Result;
use tracing::{debug, info, warn};

use super::gesture::drag_gesture;
use super::{
    AutomationAction, AutomationTimings, CancellationFlag, RunReport, SkipReason, SkippedApp,
    SkippedFolder,
};
use crate::event_bus::OrganizerEvent;
use crate::models::{Category, Folder, FolderPlan, Point};
use crate::screen::{find_icon, UiTreeProvider};

/// 生成器内部阶段
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    /// 尚未开始，先等待用户回到桌面
    Settle,
    /// 准备处理当前文件夹
    FolderStart { attempt: u32 },
    /// 文件夹创建手势已产出，下一步等待动画
    FolderCreated { anchor: Point },
    /// 把第 index 个应用移入文件夹
    Insert { anchor: Point, index: usize, attempt: u32 },
    /// 第 index 个应用的手势已产出，下一步等待
    Inserted { anchor: Point, index: usize },
    /// 当前文件夹处理完毕
    FolderEnd,
    /// 序列结束
    Finished,
}

/// 整理步骤生成器
pub struct AutomationSequence {
    plan: FolderPlan,
    timings: AutomationTimings,
    cancel: CancellationFlag,
    folder_index: usize,
    stage: Stage,
    report: RunReport,
    events: Vec<OrganizerEvent>,
}

impl AutomationSequence {
    pub fn new(plan: FolderPlan, timings: AutomationTimings, cancel: CancellationFlag) -> Self {
        Self {
            plan,
            timings,
            cancel,
            folder_index: 0,
            stage: Stage::Settle,
            report: RunReport::default(),
            events: Vec::new(),
        }
    }

    /// 回到起点，重新执行整个规划
    pub fn rewind(&mut self) {
        self.folder_index = 0;
        self.stage = Stage::Settle;
        self.report = RunReport::default();
        self.events.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// 取出自上次调用以来产生的进度事件
    pub fn drain_events(&mut self) -> Vec<OrganizerEvent> {
        std::mem::take(&mut self.events)
    }

    /// 产出下一个动作，序列结束时返回 `None`
    ///
    /// 只有元素树访问失败会返回错误；找不到图标或根节点只会跳过
    pub fn next_action(&mut self, screen: &dyn UiTreeProvider) -> Result<Option<AutomationAction>> {
        loop {
            match self.stage {
                Stage::Settle => {
                    info!(
                        "开始整理: {} 个文件夹，等待 {}ms 回到桌面",
                        self.plan.len(),
                        self.timings.initial_settle_ms
                    );
                    self.stage = Stage::FolderStart { attempt: 0 };
                    return Ok(Some(AutomationAction::Wait(self.timings.initial_settle())));
                }

                Stage::FolderStart { attempt } => {
                    if self.checkpoint_cancelled() {
                        return Ok(None);
                    }
                    if self.folder_index >= self.plan.len() {
                        info!("整理完成");
                        self.stage = Stage::Finished;
                        return Ok(None);
                    }
                    if let Some(action) = self.begin_folder(screen, attempt)? {
                        return Ok(Some(action));
                    }
                }

                Stage::FolderCreated { anchor } => {
                    self.stage = Stage::Insert {
                        anchor,
                        index: 2,
                        attempt: 0,
                    };
                    return Ok(Some(AutomationAction::Wait(self.timings.folder_settle())));
                }

                Stage::Insert {
                    anchor,
                    index,
                    attempt,
                } => {
                    if self.checkpoint_cancelled() {
                        return Ok(None);
                    }
                    if let Some(action) = self.insert_app(screen, anchor, index, attempt)? {
                        return Ok(Some(action));
                    }
                }

                Stage::Inserted { anchor, index } => {
                    self.stage = Stage::Insert {
                        anchor,
                        index: index + 1,
                        attempt: 0,
                    };
                    return Ok(Some(AutomationAction::Wait(self.timings.insert_delay())));
                }

                Stage::FolderEnd => {
                    self.folder_index += 1;
                    self.stage = Stage::FolderStart { attempt: 0 };
                    if self.folder_index < self.plan.len() && !self.cancel.is_cancelled() {
                        return Ok(Some(AutomationAction::Wait(
                            self.timings.inter_folder_delay(),
                        )));
                    }
                }

                Stage::Finished => return Ok(None),
            }
        }
    }

    fn current_folder(&self) -> &Folder {
        &self.plan.folders[self.folder_index]
    }

    fn checkpoint_cancelled(&mut self) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        info!(
            "整理已取消，剩余 {} 个文件夹未处理",
            self.plan.len().saturating_sub(self.folder_index)
        );
        self.report.cancelled = true;
        self.stage = Stage::Finished;
        true
    }

    /// 处理文件夹的开始：定位前两个应用并产出创建手势
    ///
    /// 返回 `None` 表示该文件夹已结束，阶段已切换
    fn begin_folder(
        &mut self,
        screen: &dyn UiTreeProvider,
        attempt: u32,
    ) -> Result<Option<AutomationAction>> {
        let folder = self.current_folder();
        let category = folder.category;

        if folder.apps.is_empty() {
            self.skip_folder(category, SkipReason::EmptyFolder);
            return Ok(None);
        }

        let first_label = folder.apps[0].display_name.clone();
        let second_label = folder.apps.get(1).map(|app| app.display_name.clone());
        if attempt == 0 {
            info!(
                "创建文件夹: {} ({} 个应用)",
                category.display_name(),
                folder.apps.len()
            );
        }

        let Some(root) = screen.active_root()? else {
            return Ok(self.retry_folder_or_skip(category, attempt, SkipReason::RootUnavailable));
        };

        let Some(first_bounds) = find_icon(&root, &first_label) else {
            return Ok(self.retry_folder_or_skip(
                category,
                attempt,
                SkipReason::IconNotFound { label: first_label },
            ));
        };

        let Some(second_label) = second_label else {
            debug!("文件夹 {} 只有一个应用，无需拖动", category.display_name());
            self.skip_folder(category, SkipReason::SingleApp);
            return Ok(None);
        };

        let Some(second_bounds) = find_icon(&root, &second_label) else {
            return Ok(self.retry_folder_or_skip(
                category,
                attempt,
                SkipReason::AnchorNotFound {
                    label: second_label,
                },
            ));
        };

        // 同名应用会定位到同一个图标，无法拖到自身上
        if second_bounds == first_bounds {
            warn!(
                "跳过文件夹 {}: {} 与 {} 指向同一个图标",
                category.display_name(),
                first_label,
                second_label
            );
            self.skip_folder(
                category,
                SkipReason::AnchorNotFound {
                    label: second_label,
                },
            );
            return Ok(None);
        }

        let anchor = second_bounds.center();
        let gesture = drag_gesture(
            first_bounds.center(),
            anchor,
            self.timings.gesture_duration_ms,
        );

        self.report.folders_created += 1;
        self.report.apps_moved += 2;
        self.report.gestures += 1;
        self.events.push(OrganizerEvent::FolderCreated {
            category,
            first_app: first_label,
            anchor_app: second_label,
        });
        self.stage = Stage::FolderCreated { anchor };

        Ok(Some(AutomationAction::Drag(gesture)))
    }

    /// 把第 index 个应用拖到锚点
    fn insert_app(
        &mut self,
        screen: &dyn UiTreeProvider,
        anchor: Point,
        index: usize,
        attempt: u32,
    ) -> Result<Option<AutomationAction>> {
        let folder = self.current_folder();
        let category = folder.category;
        let Some(app) = folder.apps.get(index) else {
            self.stage = Stage::FolderEnd;
            return Ok(None);
        };
        let label = app.display_name.clone();

        let bounds = screen
            .active_root()?
            .and_then(|root| find_icon(&root, &label));

        match bounds {
            Some(bounds) if bounds.center() == anchor => {
                warn!("应用图标与锚点重合，跳过: {}", label);
                self.skip_app(category, label, anchor, index);
                Ok(None)
            }
            Some(bounds) => {
                self.report.apps_moved += 1;
                self.report.gestures += 1;
                self.events.push(OrganizerEvent::AppMoved {
                    category,
                    app_name: label,
                });
                self.stage = Stage::Inserted { anchor, index };
                Ok(Some(AutomationAction::Drag(drag_gesture(
                    bounds.center(),
                    anchor,
                    self.timings.gesture_duration_ms,
                ))))
            }
            None if attempt < self.timings.lookup_retries => {
                debug!("未找到应用图标: {}，{}ms 后重试", label, self.timings.retry_delay_ms);
                self.stage = Stage::Insert {
                    anchor,
                    index,
                    attempt: attempt + 1,
                };
                Ok(Some(AutomationAction::Wait(self.timings.retry_delay())))
            }
            None => {
                warn!("未找到应用图标，跳过: {}", label);
                self.skip_app(category, label, anchor, index);
                Ok(None)
            }
        }
    }

    fn skip_app(&mut self, category: Category, label: String, anchor: Point, index: usize) {
        self.report.skipped_apps.push(SkippedApp {
            category,
            app_name: label.clone(),
        });
        self.events.push(OrganizerEvent::AppSkipped {
            category,
            app_name: label,
        });
        self.stage = Stage::Insert {
            anchor,
            index: index + 1,
            attempt: 0,
        };
    }

    fn retry_folder_or_skip(
        &mut self,
        category: Category,
        attempt: u32,
        reason: SkipReason,
    ) -> Option<AutomationAction> {
        if attempt < self.timings.lookup_retries {
            debug!(
                "文件夹 {}: {}，{}ms 后重试",
                category.display_name(),
                reason,
                self.timings.retry_delay_ms
            );
            self.stage = Stage::FolderStart {
                attempt: attempt + 1,
            };
            return Some(AutomationAction::Wait(self.timings.retry_delay()));
        }

        warn!("跳过文件夹 {}: {}", category.display_name(), reason);
        self.skip_folder(category, reason);
        None
    }

    fn skip_folder(&mut self, category: Category, reason: SkipReason) {
        self.report.skipped_folders.push(SkippedFolder {
            category,
            reason: reason.clone(),
        });
        self.events
            .push(OrganizerEvent::FolderSkipped { category, reason });
        self.stage = Stage::FolderEnd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::test_support::{collect_actions, drags, icon_bounds, FakeScreen};
    use crate::models::{Application, Category, Folder};
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn folder(category: Category, names: &[&str]) -> Folder {
        Folder {
            category,
            apps: names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Application::new(
                        format!("com.example.{}", i),
                        *name,
                        BTreeSet::from([category]),
                    )
                })
                .collect(),
        }
    }

    fn sequence(
        folders: Vec<Folder>,
        timings: AutomationTimings,
    ) -> (AutomationSequence, CancellationFlag) {
        let cancel = CancellationFlag::new();
        (
            AutomationSequence::new(FolderPlan::new(folders), timings, cancel.clone()),
            cancel,
        )
    }

    fn no_retry() -> AutomationTimings {
        AutomationTimings {
            lookup_retries: 0,
            ..AutomationTimings::default()
        }
    }

    #[test]
    fn test_full_folder_action_order() {
        let screen = FakeScreen::launcher(&["A", "B", "C", "D"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Game, &["A", "B", "C", "D"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        let anchor = icon_bounds(1).center();
        let timings = AutomationTimings::default();

        assert_eq!(
            actions,
            vec![
                AutomationAction::Wait(timings.initial_settle()),
                AutomationAction::Drag(drag_gesture(icon_bounds(0).center(), anchor, 1000)),
                AutomationAction::Wait(timings.folder_settle()),
                AutomationAction::Drag(drag_gesture(icon_bounds(2).center(), anchor, 1000)),
                AutomationAction::Wait(timings.insert_delay()),
                AutomationAction::Drag(drag_gesture(icon_bounds(3).center(), anchor, 1000)),
                AutomationAction::Wait(timings.insert_delay()),
            ]
        );

        let report = seq.report();
        assert_eq!(report.folders_created, 1);
        assert_eq!(report.apps_moved, 4);
        assert_eq!(report.gestures, 3);
        assert!(!report.cancelled);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_missing_anchor_skips_folder_and_continues() {
        // 第一个文件夹的第二个应用不在屏幕上
        let screen = FakeScreen::launcher(&["A", "C", "D"]);
        let (mut seq, _) = sequence(
            vec![
                folder(Category::Social, &["A", "B"]),
                folder(Category::Tools, &["C", "D"]),
            ],
            no_retry(),
        );

        let actions = collect_actions(&mut seq, &screen).unwrap();
        let gestures = drags(&actions);
        assert_eq!(gestures.len(), 1, "只有第二个文件夹会派发手势");
        assert_eq!(gestures[0].start, icon_bounds(1).center());
        assert_eq!(gestures[0].end, icon_bounds(2).center());

        let report = seq.into_report();
        assert_eq!(report.folders_created, 1);
        assert!(!report.cancelled);
        assert_eq!(
            report.skipped_folders[0].reason,
            SkipReason::AnchorNotFound {
                label: "B".to_string()
            }
        );
    }

    #[test]
    fn test_missing_first_icon_skips_folder() {
        let screen = FakeScreen::launcher(&["B"]);
        let (mut seq, _) = sequence(vec![folder(Category::Social, &["A", "B"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&actions).is_empty());
        assert_eq!(
            seq.report().skipped_folders[0].reason,
            SkipReason::IconNotFound {
                label: "A".to_string()
            }
        );
    }

    #[test]
    fn test_single_app_folder_needs_no_gesture() {
        let screen = FakeScreen::launcher(&["A"]);
        let (mut seq, _) = sequence(vec![folder(Category::Social, &["A"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&actions).is_empty());
        assert_eq!(seq.report().folders_created, 0);
        assert_eq!(seq.report().skipped_folders[0].reason, SkipReason::SingleApp);
    }

    #[test]
    fn test_empty_folder_is_skipped() {
        let screen = FakeScreen::launcher(&[]);
        let (mut seq, _) = sequence(vec![folder(Category::Social, &[])], no_retry());

        collect_actions(&mut seq, &screen).unwrap();
        assert_eq!(seq.report().skipped_folders[0].reason, SkipReason::EmptyFolder);
        assert_eq!(screen.queries(), 0, "空文件夹不应查询屏幕");
    }

    #[test]
    fn test_missing_root_skips_folder() {
        let screen = FakeScreen::new(None);
        let (mut seq, _) = sequence(
            vec![
                folder(Category::Social, &["A", "B"]),
                folder(Category::Tools, &["C", "D"]),
            ],
            no_retry(),
        );

        let actions = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&actions).is_empty());
        assert_eq!(seq.report().skipped_folders.len(), 2);
        assert!(!seq.report().cancelled);
    }

    #[test]
    fn test_missing_member_is_skipped_individually() {
        let screen = FakeScreen::launcher(&["A", "B", "D"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Game, &["A", "B", "C", "D"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        let gestures = drags(&actions);
        assert_eq!(gestures.len(), 2);
        assert_eq!(gestures[1].start, icon_bounds(2).center());

        let report = seq.report();
        assert_eq!(report.apps_moved, 3);
        assert_eq!(report.skipped_apps[0].app_name, "C");
    }

    #[test]
    fn test_lookup_retry_sees_fresh_snapshot() {
        let screen = FakeScreen::launcher(&["A"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Game, &["A", "B"])], AutomationTimings::default());

        assert!(matches!(seq.next_action(&screen).unwrap(), Some(AutomationAction::Wait(_))));
        // 锚点未出现，产出重试等待
        assert_eq!(
            seq.next_action(&screen).unwrap(),
            Some(AutomationAction::Wait(Duration::from_millis(500)))
        );

        // 桌面动画结束后锚点出现
        screen.set_root(Some(crate::automation::test_support::launcher_root(&["A", "B"])));
        assert!(matches!(seq.next_action(&screen).unwrap(), Some(AutomationAction::Drag(_))));
        assert_eq!(seq.report().folders_created, 1);
        assert!(seq.report().skipped_folders.is_empty());
    }

    #[test]
    fn test_retry_exhausted_skips_folder() {
        let screen = FakeScreen::launcher(&["A"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Game, &["A", "B"])], AutomationTimings::default());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&actions).is_empty());
        assert_eq!(screen.queries(), 2, "默认只重试一次");
        assert_eq!(seq.report().skipped_folders.len(), 1);
    }

    #[test]
    fn test_cancel_during_inter_folder_wait() {
        let labels = ["A1", "A2", "B1", "B2", "C1", "C2", "D1", "D2", "E1", "E2"];
        let screen = FakeScreen::launcher(&labels);
        let folders: Vec<Folder> = labels
            .chunks(2)
            .zip([
                Category::Social,
                Category::Office,
                Category::Music,
                Category::Game,
                Category::Tools,
            ])
            .map(|(names, category)| folder(category, names))
            .collect();
        let timings = no_retry();
        let (mut seq, cancel) = sequence(folders, timings);

        let mut waits_between_folders = 0;
        let mut gestures = 0;
        while let Some(action) = seq.next_action(&screen).unwrap() {
            match action {
                AutomationAction::Drag(_) => gestures += 1,
                AutomationAction::Wait(d) if d == timings.inter_folder_delay() => {
                    waits_between_folders += 1;
                    // 第二个文件夹之后的等待期间取消
                    if waits_between_folders == 2 {
                        cancel.cancel();
                    }
                }
                AutomationAction::Wait(_) => {}
            }
        }

        assert_eq!(gestures, 2, "只有前两个文件夹被处理");
        let report = seq.report();
        assert!(report.cancelled);
        assert_eq!(report.folders_created, 2);
        assert!(seq.next_action(&screen).unwrap().is_none());
    }

    #[test]
    fn test_cancel_stops_inserts_at_next_checkpoint() {
        let screen = FakeScreen::launcher(&["A", "B", "C", "D"]);
        let (mut seq, cancel) =
            sequence(vec![folder(Category::Game, &["A", "B", "C", "D"])], no_retry());

        seq.next_action(&screen).unwrap(); // 初始等待
        assert!(matches!(seq.next_action(&screen).unwrap(), Some(AutomationAction::Drag(_))));
        cancel.cancel();

        let rest = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&rest).is_empty(), "取消后不应再派发手势");
        assert!(seq.report().cancelled);
    }

    #[test]
    fn test_events_describe_progress() {
        let screen = FakeScreen::launcher(&["A", "B", "C"]);
        let (mut seq, _) = sequence(
            vec![folder(Category::Game, &["A", "B", "C", "X"]), folder(Category::Social, &["Y"])],
            no_retry(),
        );

        collect_actions(&mut seq, &screen).unwrap();
        let events = seq.drain_events();
        assert!(matches!(
            events[0],
            OrganizerEvent::FolderCreated {
                category: Category::Game,
                ..
            }
        ));
        assert!(matches!(events[1], OrganizerEvent::AppMoved { .. }));
        assert!(matches!(events[2], OrganizerEvent::AppSkipped { .. }));
        assert!(matches!(
            events[3],
            OrganizerEvent::FolderSkipped {
                category: Category::Social,
                ..
            }
        ));
        assert!(seq.drain_events().is_empty());
    }

    #[test]
    fn test_tree_failure_is_an_error() {
        let screen = FakeScreen::broken();
        let (mut seq, _) = sequence(vec![folder(Category::Game, &["A", "B"])], no_retry());

        seq.next_action(&screen).unwrap();
        assert!(seq.next_action(&screen).is_err());
    }

    #[test]
    fn test_rewind_restarts_sequence() {
        let screen = FakeScreen::launcher(&["A", "B"]);
        let (mut seq, _) = sequence(vec![folder(Category::Game, &["A", "B"])], no_retry());

        let first = collect_actions(&mut seq, &screen).unwrap();
        seq.rewind();
        let second = collect_actions(&mut seq, &screen).unwrap();
        assert_eq!(first, second);
        assert_eq!(seq.report().folders_created, 1);
    }

    #[test]
    fn test_same_named_anchor_skips_folder() {
        // 两个同名应用定位到同一个图标
        let screen = FakeScreen::launcher(&["Notes", "C"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Office, &["Notes", "Notes", "C"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        assert!(drags(&actions).is_empty());

        let report = seq.into_report();
        assert_eq!(report.folders_created, 0);
        assert_eq!(report.gestures, 0);
        assert_eq!(
            report.skipped_folders[0].reason,
            SkipReason::AnchorNotFound {
                label: "Notes".to_string()
            }
        );
    }

    #[test]
    fn test_member_on_anchor_is_skipped() {
        let screen = FakeScreen::launcher(&["A", "B", "C"]);
        let (mut seq, _) =
            sequence(vec![folder(Category::Game, &["A", "B", "B", "C"])], no_retry());

        let actions = collect_actions(&mut seq, &screen).unwrap();
        let gestures = drags(&actions);
        let anchor = icon_bounds(1).center();
        assert_eq!(gestures.len(), 2);
        assert!(gestures.iter().all(|gesture| gesture.start != gesture.end));
        assert_eq!(gestures[1].start, icon_bounds(2).center());
        assert_eq!(gestures[1].end, anchor);

        let report = seq.into_report();
        assert_eq!(report.apps_moved, 3);
        assert_eq!(report.skipped_apps.len(), 1);
        assert_eq!(report.skipped_apps[0].app_name, "B");
    }
}
