// 测试用的应用清单

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::InventoryProvider;
use crate::models::{IconHandle, InstalledApp};

/// 固定内容的应用清单，可在测试中途替换
pub struct StaticInventory {
    apps: Mutex<Vec<InstalledApp>>,
    icons: HashMap<String, IconHandle>,
    scan_icons: bool,
}

impl StaticInventory {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            apps: Mutex::new(installed(entries)),
            icons: HashMap::new(),
            scan_icons: true,
        }
    }

    /// 扫描结果不带图标，只能通过 load_icon 加载
    pub fn without_scan_icons(mut self) -> Self {
        self.scan_icons = false;
        self
    }

    pub fn with_icon(mut self, identifier: &str, icon: IconHandle) -> Self {
        self.icons.insert(identifier.to_string(), icon);
        self
    }

    pub fn replace(&self, entries: &[(&str, &str)]) {
        *self.apps.lock().unwrap() = installed(entries);
    }
}

fn installed(entries: &[(&str, &str)]) -> Vec<InstalledApp> {
    entries
        .iter()
        .map(|(identifier, name)| InstalledApp {
            identifier: identifier.to_string(),
            display_name: name.to_string(),
            icon: Some(IconHandle::new(vec![1u8, 2, 3])),
        })
        .collect()
}

#[async_trait]
impl InventoryProvider for StaticInventory {
    async fn installed_applications(&self) -> Result<Vec<InstalledApp>> {
        let mut apps = self.apps.lock().unwrap().clone();
        if !self.scan_icons {
            for app in &mut apps {
                app.icon = None;
            }
        }
        Ok(apps)
    }

    async fn load_icon(&self, identifier: &str) -> Option<IconHandle> {
        self.icons.get(identifier).cloned()
    }
}
