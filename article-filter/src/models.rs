use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use utils_common::compression::from_compressed_with_max_version;
use utils_common::models::{Article, IndexType};
use utils_common::{kebab_case, IndexError};

/// 标签页的URL前缀
pub const TAGS_PATH: &str = "/tags";

/// 标签索引 - 存储文章列表和标签到文章位置的映射
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TagIndex {
    /// 所有文章，保持原始顺序
    pub articles: Vec<Article>,
    /// 标签 -> 文章在 `articles` 中的位置（升序，不重复）
    pub tag_index: BTreeMap<String, Vec<usize>>,
}

/// 单个标签页的数据
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TagPage {
    pub tag: String,
    /// 页面路径，例如 `/tags/learning-mdx`
    pub path: String,
    /// 页面标题，例如 `2 posts tagged with "Rust"`
    pub header: String,
    /// 按发布时间从新到旧排列的文章路径
    pub slugs: Vec<String>,
}

impl TagIndex {
    /// 从文章列表构建索引
    pub fn build(articles: Vec<Article>) -> Self {
        let mut tag_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (i, article) in articles.iter().enumerate() {
            for tag in &article.tags {
                let positions = tag_index.entry(tag.clone()).or_default();
                // 同一篇文章重复写了同一个标签
                if positions.last() != Some(&i) {
                    positions.push(i);
                }
            }
        }

        Self { articles, tag_index }
    }

    /// 从压缩的二进制数据恢复索引
    pub fn from_compressed(data: &[u8]) -> Result<Self, IndexError> {
        from_compressed_with_max_version(data, IndexType::Tags.version()[0])
    }

    /// 所有标签，按字母顺序
    pub fn tags(&self) -> Vec<&str> {
        self.tag_index.keys().map(String::as_str).collect()
    }

    /// 带某个标签的文章数量
    pub fn count(&self, tag: &str) -> usize {
        self.tag_index.get(tag).map_or(0, Vec::len)
    }

    /// 带某个标签的文章，新发布的在前
    ///
    /// 没有日期的文章排在最后，日期相同时保持原始顺序。
    pub fn articles_for_tag(&self, tag: &str) -> Vec<&Article> {
        let Some(positions) = self.tag_index.get(tag) else {
            return Vec::new();
        };

        let mut found: Vec<&Article> = positions
            .iter()
            .filter_map(|&i| self.articles.get(i))
            .collect();
        found.sort_by(|a, b| newest_first(a, b));
        found
    }

    /// 为每个标签生成标签页数据
    pub fn tag_pages(&self) -> Vec<TagPage> {
        self.tag_index
            .keys()
            .map(|tag| {
                let slugs: Vec<String> = self
                    .articles_for_tag(tag)
                    .into_iter()
                    .map(|article| article.slug.clone())
                    .collect();

                TagPage {
                    tag: tag.clone(),
                    path: tag_path(tag),
                    header: tag_header(tag, slugs.len()),
                    slugs,
                }
            })
            .collect()
    }
}

/// 标签页路径
pub fn tag_path(tag: &str) -> String {
    format!("{}/{}", TAGS_PATH, kebab_case(tag))
}

/// 标签页标题，单复数按数量区分
pub fn tag_header(tag: &str, count: usize) -> String {
    let noun = if count == 1 { "post" } else { "posts" };
    format!("{} {} tagged with \"{}\"", count, noun, tag)
}

/// 发布时间从新到旧，没有日期的排在最后
pub fn newest_first(a: &Article, b: &Article) -> Ordering {
    match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn sample() -> TagIndex {
        TagIndex::build(vec![
            Article::new("Undated Rust", &["Rust"], "/blog/undated/"),
            Article::new("Old Rust", &["Rust", "Learning"], "/blog/old/").with_date(day(1)),
            Article::new("New Rust", &["Rust", "Rust"], "/blog/new/").with_date(day(20)),
            Article::new("Learning MDX", &["MDX", "Learning"], "/blog/mdx/").with_date(day(10)),
        ])
    }

    #[test]
    fn tags_are_sorted_and_unique() {
        let index = sample();
        assert_eq!(index.tags(), vec!["Learning", "MDX", "Rust"]);
        assert_eq!(index.tag_index["Rust"], vec![0, 1, 2]);
        assert_eq!(index.count("Rust"), 3);
        assert_eq!(index.count("Go"), 0);
    }

    #[test]
    fn articles_for_tag_newest_first_undated_last() {
        let index = sample();
        let slugs: Vec<&str> = index
            .articles_for_tag("Rust")
            .iter()
            .map(|a| a.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["/blog/new/", "/blog/old/", "/blog/undated/"]);
        assert!(index.articles_for_tag("Go").is_empty());
    }

    #[test]
    fn tag_pages_use_kebab_paths_and_plural_headers() {
        let pages = sample().tag_pages();
        let mdx = pages.iter().find(|p| p.tag == "MDX").unwrap();
        assert_eq!(mdx.path, "/tags/mdx");
        assert_eq!(mdx.header, "1 post tagged with \"MDX\"");

        let learning = pages.iter().find(|p| p.tag == "Learning").unwrap();
        assert_eq!(learning.header, "2 posts tagged with \"Learning\"");
        assert_eq!(learning.slugs, vec!["/blog/mdx/", "/blog/old/"]);
    }

    #[test]
    fn multi_word_tag_path() {
        assert_eq!(tag_path("Web Assembly"), "/tags/web-assembly");
    }
}
