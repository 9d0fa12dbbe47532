use serde::{Deserialize, Serialize};
use utils_common::models::Article;

/// 标签按钮默认展示的主题
pub const DEFAULT_TOPICS: [&str; 4] = ["Rust", "React", "Learning", "MDX"];

/// 模糊匹配参数
///
/// 默认值即文章搜索框使用的固定参数。分数越低越相关，0 表示完全匹配。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// 匹配阈值，越小越严格
    pub threshold: f64,
    /// 期望匹配出现的位置
    pub location: usize,
    /// 匹配位置偏离 `location` 的容忍距离
    pub distance: usize,
    /// 最短连续匹配字符数
    pub min_match_char_length: usize,
    /// 是否按相关度排序
    pub should_sort: bool,
    /// 是否启用扩展查询语法（`=`、`'`、`^`、`!`、`$`、`|`）
    pub use_extended_search: bool,
    pub is_case_sensitive: bool,
    /// 忽略位置，只按错误数计分
    pub ignore_location: bool,
    /// 忽略字段长度归一化
    pub ignore_field_norm: bool,
    /// 找到满足阈值的匹配后继续扫描整个文本
    pub find_all_matches: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            location: 0,
            distance: 100,
            min_match_char_length: 1,
            should_sort: true,
            use_extended_search: true,
            is_case_sensitive: false,
            ignore_location: false,
            ignore_field_norm: false,
            find_all_matches: false,
        }
    }
}

/// 搜索框配置 - 由页面以 JSON 传入，缺省字段使用默认值
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchBoxConfig {
    /// 标签按钮列表
    pub topics: Vec<String>,
    /// 模糊匹配参数
    pub options: SearchOptions,
}

impl Default for SearchBoxConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            options: SearchOptions::default(),
        }
    }
}

/// 带分数的搜索结果
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ScoredArticle<'a> {
    pub article: &'a Article,
    /// 文章在原始列表中的位置
    pub position: usize,
    /// 相关度分数，0 为完全匹配
    pub score: f64,
}
