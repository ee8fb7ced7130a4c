//! 应用分类器
//!
//! 根据包名和应用名的关键词匹配为应用分配零到多个分类，
//! 并判断哪些包属于需要在扫描时排除的系统核心应用

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Category;
pub use rules::{keywords_for, CATEGORY_RULES, SYSTEM_PACKAGES};

/// 系统应用匹配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SystemAppPolicy {
    /// 包名完全匹配才排除
    #[default]
    Exact,
    /// 包名以列表中任一条目开头即排除
    Prefix,
}

/// 根据包名和应用名分类
///
/// 大小写不敏感的子串匹配，一个应用可以同时命中多个分类；
/// 没有命中任何规则时返回 `{Other}`
pub fn classify(identifier: &str, display_name: &str) -> BTreeSet<Category> {
    let lower_identifier = identifier.to_lowercase();
    let lower_name = display_name.to_lowercase();

    let mut categories: BTreeSet<Category> = CATEGORY_RULES
        .iter()
        .filter(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| lower_identifier.contains(keyword) || lower_name.contains(keyword))
        })
        .map(|(category, _)| *category)
        .collect();

    if categories.is_empty() {
        categories.insert(Category::Other);
    }

    categories
}

/// 判断是否为系统核心应用
pub fn is_system_application(identifier: &str, policy: SystemAppPolicy) -> bool {
    match policy {
        SystemAppPolicy::Exact => SYSTEM_PACKAGES.contains(&identifier),
        SystemAppPolicy::Prefix => SYSTEM_PACKAGES
            .iter()
            .any(|package| identifier.starts_with(package)),
    }
}

/// 携带配置的分类器
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    system_policy: SystemAppPolicy,
}

impl Classifier {
    pub fn new(system_policy: SystemAppPolicy) -> Self {
        Self { system_policy }
    }

    pub fn system_policy(&self) -> SystemAppPolicy {
        self.system_policy
    }

    pub fn classify(&self, identifier: &str, display_name: &str) -> BTreeSet<Category> {
        classify(identifier, display_name)
    }

    pub fn is_system_application(&self, identifier: &str) -> bool {
        is_system_application(identifier, self.system_policy)
    }
}
