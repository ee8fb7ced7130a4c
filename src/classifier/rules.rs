// 分类规则表 - 包名和应用名关键词映射
//
// 按分类声明顺序排列，分类器按此顺序遍历

use crate::models::Category;

/// 分类规则：(分类, 关键词片段)
pub static CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Social,
        &[
            "wechat", "weixin", "tencent.mm", "tencent.mobileqq", "qq",
            "sina.weibo", "zhihu", "douban", "momo", "tantan", "soul",
            "xingin.xhs", "kuaishou", "ss.android.ugc", // 小红书、快手、抖音
            "facebook", "twitter", "instagram", "whatsapp", "telegram",
            "line", "kakao", "snapchat", "tiktok", "discord", "skype",
            "微信", "微博", "知乎", "豆瓣", "陌陌", "探探",
        ],
    ),
    (
        Category::Office,
        &[
            "alibaba.android.rimet", "tencent.wework", "feishu", "lark",
            "dingtalk", "office", "microsoft", "zoom", "slack",
            "wps", "evernote", "notion", "trello", "asana",
            "teams", "webex", "citrix", "teamviewer",
            "钉钉", "企业微信", "飞书", "印象笔记", "有道云", "石墨文档",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "qiyi.video", "tencent.qqlive", "youku", "bilibili",
            "spotify", "youtube", "netflix", "hulu", "disney",
            "iqiyi", "mgtv", "pptv", "sohu.sohuvideo", "xigua",
            "爱奇艺", "腾讯视频", "优酷", "哔哩哔哩", "芒果tv", "西瓜视频",
        ],
    ),
    (
        Category::Music,
        &[
            "netease.cloudmusic", "tencent.qqmusic", "kugou", "kuwo",
            "spotify", "music", "radio", "podcast",
            "网易云音乐", "qq音乐", "酷狗音乐", "酷我音乐", "喜马拉雅", "荔枝fm",
        ],
    ),
    (
        Category::Shopping,
        &[
            "taobao", "tmall", "jd", "jingdong", "pinduoduo",
            "vipshop", "suning", "gome", "dangdang", "amazon",
            "sankuai.meituan", "dianping", "ele.me", "eleme",
            "dewu", "xiaohongshu", "alibaba", "shopee",
            "淘宝", "天猫", "京东", "拼多多", "美团", "大众点评", "饿了么", "得物",
        ],
    ),
    (
        Category::Finance,
        &[
            "alipay", "eg.android.alipaygphone", "tencent.mm.plugin.wallet",
            "unionpay", "icbc", "ccb", "abc", "boc", "bank", "banking",
            "cmb", "cmbchina", "spdb", "cib", "ceb",
            "hsbc", "paypal", "venmo", "cashapp", "chase",
            "支付宝", "银行", "理财", "证券", "股票", "基金",
        ],
    ),
    (
        Category::Travel,
        &[
            "autonavi.minimap", "baidu.baidumap", "didi", "uber",
            "ctrip", "qunar", "tuniu", "mafengwo", "airbnb",
            "12306", "railway", "flight", "hotel",
            "高德地图", "百度地图", "滴滴", "携程", "去哪儿", "飞猪",
        ],
    ),
    (
        Category::Health,
        &[
            "sport", "fitness", "health", "medical", "hospital",
            "keep", "nike.training", "step", "pedometer", "workout",
            "运动", "健康", "健身", "医疗", "医院", "步数",
        ],
    ),
    (
        Category::News,
        &[
            "toutiao", "news", "reader", "rss", "feed",
            "jinri.toutiao", "tencent.news", "netease.newsreader",
            "今日头条", "新闻", "资讯", "阅读器",
        ],
    ),
    (
        Category::Photo,
        &[
            "camera", "photo", "gallery", "picture", "image",
            "meitu", "meituxiuxiu", "vsco", "snapseed", "lightroom",
            "相机", "相册", "照片", "美图", "图片",
        ],
    ),
    (
        Category::Education,
        &[
            "education", "learn", "study", "school", "course",
            "yuanfudao", "zuoyebang", "duolingo", "khan",
            "教育", "学习", "课程", "作业", "猿辅导", "作业帮", "学而思",
        ],
    ),
    (
        Category::Tools,
        &[
            "baidu.netdisk", "tencent.mtt", "uc.browser", "chrome",
            "calculator", "cleanmaster", "security", "flashlight",
            "weather", "vpn", "password", "file.manager", "scanner",
            "compress", "translate", "input",
            "百度网盘", "浏览器", "文件", "扫描", "天气", "计算器", "输入法", "翻译",
        ],
    ),
    (
        Category::Game,
        &[
            "tencent.tmgp", "game", "play", "pubg", "吃鸡",
            "mihoyo", "supercell", "mojang", "rockstar",
            "unity", "unreal", "steam", "epicgames",
            "游戏", "原神", "王者", "和平精英",
        ],
    ),
    (
        Category::System,
        &[
            "android.systemui", "android.settings", "android.launcher",
            "android.providers", "miui.home", "huawei.android.launcher",
            "oppo.launcher", "vivo.launcher", "samsung.android.app.launcher",
            "google.android", "android.vending", "packageinstaller",
        ],
    ),
];

/// 系统核心应用包名（扫描清单时排除）
pub static SYSTEM_PACKAGES: &[&str] = &[
    "com.android.systemui",
    "com.android.settings",
    "com.android.providers.settings",
    "com.android.providers.calendar",
    "com.android.providers.contacts",
    "com.android.providers.media",
    "com.android.providers.telephony",
    "com.android.packageinstaller",
    "com.google.android.gms.policy",
    "com.google.android.gsf",
];

/// 获取某个分类的关键词，“全部”和“其他”没有关键词
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    CATEGORY_RULES
        .iter()
        .find(|(rule_category, _)| *rule_category == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_follow_declaration_order() {
        let categories: Vec<Category> = CATEGORY_RULES.iter().map(|(c, _)| *c).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn test_keywords_are_lowercase() {
        // 分类器只转换输入，关键词必须预先小写
        for (category, keywords) in CATEGORY_RULES {
            for keyword in *keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{:?}: {}", category, keyword);
            }
        }
    }

    #[test]
    fn test_sentinels_have_no_rules() {
        assert!(keywords_for(Category::All).is_empty());
        assert!(keywords_for(Category::Other).is_empty());
        assert!(keywords_for(Category::Social).contains(&"wechat"));
    }

    #[test]
    fn test_every_assignable_category_except_other_has_rules() {
        for category in Category::assignable().filter(|c| *c != Category::Other) {
            assert!(!keywords_for(category).is_empty(), "{:?} 缺少规则", category);
        }
    }
}
