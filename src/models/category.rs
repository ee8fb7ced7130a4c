// 分类与整理偏好定义

use serde::{Deserialize, Serialize};

/// 应用分类
///
/// 声明顺序即排序顺序：分类规则表按此顺序遍历，
/// 文件夹大小相同时也按此顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// 全部（仅用于筛选，不会分配给任何应用）
    All,
    Social,
    Office,
    Entertainment,
    Music,
    Shopping,
    Finance,
    Travel,
    Health,
    News,
    Photo,
    Education,
    Tools,
    Game,
    System,
    /// 其他（没有规则命中时的兜底分类）
    Other,
}

impl Category {
    /// 所有分类，按声明顺序
    pub const ALL_VARIANTS: [Category; 16] = [
        Category::All,
        Category::Social,
        Category::Office,
        Category::Entertainment,
        Category::Music,
        Category::Shopping,
        Category::Finance,
        Category::Travel,
        Category::Health,
        Category::News,
        Category::Photo,
        Category::Education,
        Category::Tools,
        Category::Game,
        Category::System,
        Category::Other,
    ];

    /// 可以分配给应用的分类（不含“全部”）
    pub fn assignable() -> impl Iterator<Item = Category> {
        Self::ALL_VARIANTS
            .into_iter()
            .filter(|category| *category != Category::All)
    }

    /// 获取分类的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "全部",
            Self::Social => "社交",
            Self::Office => "办公",
            Self::Entertainment => "娱乐",
            Self::Music => "音乐",
            Self::Shopping => "购物",
            Self::Finance => "金融",
            Self::Travel => "出行",
            Self::Health => "健康",
            Self::News => "资讯",
            Self::Photo => "摄影",
            Self::Education => "教育",
            Self::Tools => "工具",
            Self::Game => "游戏",
            Self::System => "系统",
            Self::Other => "其他",
        }
    }

    /// 获取分类的文件夹图标（用于预览列表）
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Social => "💬",
            Self::Office => "💼",
            Self::Entertainment => "🎬",
            Self::Music => "🎵",
            Self::Shopping => "🛒",
            Self::Finance => "💰",
            Self::Travel => "✈️",
            Self::Health => "💊",
            Self::News => "📰",
            Self::Photo => "📷",
            Self::Education => "📚",
            Self::Tools => "🔧",
            Self::Game => "🎮",
            Self::System => "⚙️",
            Self::All | Self::Other => FALLBACK_GLYPH,
        }
    }

    /// 枚举名称（与序列化名称一致）
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Social => "SOCIAL",
            Self::Office => "OFFICE",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Music => "MUSIC",
            Self::Shopping => "SHOPPING",
            Self::Finance => "FINANCE",
            Self::Travel => "TRAVEL",
            Self::Health => "HEALTH",
            Self::News => "NEWS",
            Self::Photo => "PHOTO",
            Self::Education => "EDUCATION",
            Self::Tools => "TOOLS",
            Self::Game => "GAME",
            Self::System => "SYSTEM",
            Self::Other => "OTHER",
        }
    }

    /// 按名称解析分类，无法识别的名称归为“其他”
    pub fn from_name(value: &str) -> Category {
        Self::ALL_VARIANTS
            .into_iter()
            .find(|category| category.name() == value)
            .unwrap_or(Category::Other)
    }
}

/// 默认文件夹图标
pub const FALLBACK_GLYPH: &str = "📁";

/// 整理偏好 - 决定哪些分类可以成为文件夹
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizingPreference {
    /// 通用：所有分类都可以成为文件夹
    #[default]
    General,
    /// 工作优先
    Work,
    /// 娱乐优先
    Entertainment,
    /// 生活服务
    Lifestyle,
    /// 学习优先
    Study,
}

impl OrganizingPreference {
    pub const ALL_VARIANTS: [OrganizingPreference; 5] = [
        OrganizingPreference::General,
        OrganizingPreference::Work,
        OrganizingPreference::Entertainment,
        OrganizingPreference::Lifestyle,
        OrganizingPreference::Study,
    ];

    /// 偏好的分类列表，顺序即优先级
    pub fn preferred_categories(&self) -> &'static [Category] {
        use Category::*;
        match self {
            Self::General => &[
                Social,
                Office,
                Entertainment,
                Music,
                Shopping,
                Finance,
                Travel,
                Health,
                News,
                Photo,
                Education,
                Tools,
                Game,
                System,
            ],
            Self::Work => &[Office, Finance, Tools, Social, News, Education],
            Self::Entertainment => &[Entertainment, Music, Game, Social, Photo, Shopping],
            Self::Lifestyle => &[Shopping, Finance, Travel, Health, News, Tools],
            Self::Study => &[Education, Tools, News, Office, Social],
        }
    }

    /// 偏好是否包含该分类
    pub fn prefers(&self, category: Category) -> bool {
        self.preferred_categories().contains(&category)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::General => "通用整理",
            Self::Work => "工作优先",
            Self::Entertainment => "娱乐优先",
            Self::Lifestyle => "生活服务",
            Self::Study => "学习优先",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::General => "按全部分类创建文件夹，适合第一次整理",
            Self::Work => "突出办公、金融和工具类应用，其余归入“其他”",
            Self::Entertainment => "突出视频、音乐和游戏类应用",
            Self::Lifestyle => "突出购物、出行和健康等生活服务",
            Self::Study => "突出教育、资讯和学习工具",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_round_trip() {
        for category in Category::ALL_VARIANTS {
            assert_eq!(Category::from_name(category.name()), category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }

    #[test]
    fn test_unknown_category_name_falls_back_to_other() {
        assert_eq!(Category::from_name("PODCASTS"), Category::Other);
        assert_eq!(Category::from_name("social"), Category::Other);
    }

    #[test]
    fn test_declaration_order() {
        let mut sorted = Category::ALL_VARIANTS.to_vec();
        sorted.sort();
        assert_eq!(sorted, Category::ALL_VARIANTS.to_vec());
        assert!(Category::Social < Category::Other);
    }

    #[test]
    fn test_sentinels_use_fallback_glyph() {
        assert_eq!(Category::All.glyph(), FALLBACK_GLYPH);
        assert_eq!(Category::Other.glyph(), FALLBACK_GLYPH);
        assert_eq!(Category::Game.glyph(), "🎮");
    }

    #[test]
    fn test_preferences_never_prefer_sentinels() {
        for preference in OrganizingPreference::ALL_VARIANTS {
            assert!(!preference.prefers(Category::All));
            assert!(!preference.prefers(Category::Other));
        }
        assert_eq!(
            OrganizingPreference::Work.preferred_categories(),
            &[
                Category::Office,
                Category::Finance,
                Category::Tools,
                Category::Social,
                Category::News,
                Category::Education
            ]
        );
    }
}
