use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// URL 中搜索文本使用的参数名
pub const QUERY_PARAM: &str = "q";
/// URL 中已选标签使用的参数名
pub const TAGS_PARAM: &str = "tags";
/// `tags` 参数中分隔多个标签的字符
const TAG_SEPARATOR: &str = ",";

/// 搜索框状态：输入的文本和已选中的标签
///
/// 由页面持有，每次输入或点击标签后整体传给搜索引擎重新计算结果。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchState {
    pub query_text: String,
    pub selected_tags: BTreeSet<String>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 没有任何筛选条件
    pub fn is_empty(&self) -> bool {
        self.query_text.is_empty() && self.selected_tags.is_empty()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    /// 切换标签选中状态，返回切换后是否选中
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags.contains(tag)
    }

    /// 从 URL 查询字符串恢复状态，例如 `?q=hooks&tags=Rust,MDX`
    ///
    /// 标签以逗号分隔，重复出现的 `tags` 参数会合并。
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_PARAM => state.query_text = value.into_owned(),
                TAGS_PARAM => {
                    state.selected_tags.extend(
                        value
                            .split(TAG_SEPARATOR)
                            .filter(|tag| !tag.is_empty())
                            .map(str::to_string),
                    );
                }
                _ => {}
            }
        }

        state
    }

    /// 生成 URL 查询字符串（不含 `?`），空状态返回空字符串
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if !self.query_text.is_empty() {
            parts.push(format!("{}={}", QUERY_PARAM, encode(&self.query_text)));
        }

        if !self.selected_tags.is_empty() {
            let tags: Vec<String> = self.selected_tags.iter().map(|t| encode(t)).collect();
            parts.push(format!("{}={}", TAGS_PARAM, tags.join(TAG_SEPARATOR)));
        }

        parts.join("&")
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
