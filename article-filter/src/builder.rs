use std::fs::File;
use std::io::Write;
use std::path::Path;
use utils_common::compression::to_compressed;
use utils_common::models::{Article, IndexType};
use utils_common::IndexError;
use crate::models::TagIndex;

/// 标签索引构建器
#[derive(Debug, Default)]
pub struct FilterBuilder {
    articles: Vec<Article>,
}

impl FilterBuilder {
    /// 创建新的标签索引构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文章到索引构建器
    pub fn add_article(&mut self, article: Article) {
        self.articles.push(article);
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// 构建标签索引
    pub fn build_tag_index(&self) -> Result<TagIndex, IndexError> {
        if self.articles.is_empty() {
            return Err(IndexError::Empty);
        }

        Ok(TagIndex::build(self.articles.clone()))
    }

    /// 保存标签索引到文件，返回写入的字节数
    pub fn save_tag_index(&self, path: impl AsRef<Path>) -> Result<usize, IndexError> {
        let tag_index = self.build_tag_index()?;
        let compressed_data = to_compressed(&tag_index, IndexType::Tags.version())?;

        let mut file = File::create(path)?;
        file.write_all(&compressed_data)?;

        Ok(compressed_data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_is_an_error() {
        let builder = FilterBuilder::new();
        assert!(builder.is_empty());
        assert!(matches!(builder.build_tag_index(), Err(IndexError::Empty)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(IndexType::Tags.file_name());
        assert!(builder.save_tag_index(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn saved_index_loads_back() {
        let mut builder = FilterBuilder::new();
        builder.add_article(Article::new("Rust Basics", &["Rust"], "/blog/rust-basics/"));
        builder.add_article(Article::new("Learning MDX", &["MDX", "Learning"], "/blog/learning-mdx/"));
        assert_eq!(builder.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(IndexType::Tags.file_name());
        let written = builder.save_tag_index(&path).unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), written);

        let loaded = TagIndex::from_compressed(&data).unwrap();
        assert_eq!(loaded, builder.build_tag_index().unwrap());
        assert_eq!(loaded.tags(), vec!["Learning", "MDX", "Rust"]);
    }
}
