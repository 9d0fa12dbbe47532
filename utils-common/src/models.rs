use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 文章记录 - 搜索和标签页所需的基本信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Article {
    /// 文章标题
    pub title: String,
    /// 文章标签列表，可以为空
    #[serde(default)]
    pub tags: Vec<String>,
    /// 文章路径，在整个集合中唯一
    pub slug: String,
    /// 发布日期（来自 front matter，可选）
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(title: impl Into<String>, tags: &[&str], slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: slug.into(),
            date: None,
        }
    }

    /// 设置发布日期
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// 索引类型 - 用于区分不同的索引文件
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 文章列表，供搜索模块加载
    Articles,
    /// 标签索引，供标签页使用
    Tags,
}

impl IndexType {
    /// 每种索引当前写入的格式版本
    pub fn version(self) -> [u8; 2] {
        match self {
            IndexType::Articles => [1, 0],
            IndexType::Tags => [1, 0],
        }
    }

    /// 默认输出文件名
    pub fn file_name(self) -> &'static str {
        match self {
            IndexType::Articles => "articles.bin",
            IndexType::Tags => "tag_index.bin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_from_js_shape_without_optional_fields() {
        let article: Article =
            serde_json::from_str(r#"{"title":"Rust Basics","slug":"/blog/rust-basics/"}"#).unwrap();
        assert!(article.tags.is_empty());
        assert_eq!(article.date, None);
        assert!(!article.has_tag("Rust"));
    }

    #[test]
    fn has_tag_is_exact() {
        let article = Article::new("Learning MDX", &["MDX", "Learning"], "/blog/learning-mdx/");
        assert!(article.has_tag("MDX"));
        assert!(!article.has_tag("mdx"));
    }
}
