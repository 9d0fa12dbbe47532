use std::cmp::Ordering;

use utils_common::models::Article;

use crate::matcher::{create_searcher, ExactSearch, Searcher};
use crate::models::{ScoredArticle, SearchOptions};
use crate::query::{Field, Query};
use crate::state::SearchState;

/// 索引中的一个字段值及其长度归一化系数
struct IndexedValue {
    text: String,
    norm: f64,
}

impl IndexedValue {
    fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            norm: field_norm(text),
        })
    }
}

/// 单篇文章的索引记录
struct IndexRecord {
    title: Option<IndexedValue>,
    tags: Vec<IndexedValue>,
}

impl IndexRecord {
    fn new(article: &Article) -> Self {
        Self {
            title: IndexedValue::new(&article.title),
            tags: article.tags.iter().filter_map(|tag| IndexedValue::new(tag)).collect(),
        }
    }

    fn values(&self, field: Field) -> &[IndexedValue] {
        match field {
            Field::Title => self.title.as_ref().map(std::slice::from_ref).unwrap_or(&[]),
            Field::Tags => &self.tags,
        }
    }
}

/// 编译后的查询树，叶子节点持有匹配器
enum CompiledQuery {
    Leaf { field: Field, searcher: Box<dyn Searcher> },
    And(Vec<CompiledQuery>),
    Or(Vec<CompiledQuery>),
}

impl CompiledQuery {
    fn compile(query: &Query, options: &SearchOptions) -> Self {
        match query {
            Query::TagMatch(pattern) => CompiledQuery::Leaf {
                field: Field::Tags,
                searcher: match Query::exact_value(pattern) {
                    Some(tag) => Box::new(ExactSearch::new(tag, options.clone())),
                    None => create_searcher(pattern, options),
                },
            },
            Query::TitleMatch(pattern) => CompiledQuery::Leaf {
                field: Field::Title,
                searcher: create_searcher(pattern, options),
            },
            Query::And(children) => {
                CompiledQuery::And(children.iter().map(|c| Self::compile(c, options)).collect())
            }
            Query::Or(children) => {
                CompiledQuery::Or(children.iter().map(|c| Self::compile(c, options)).collect())
            }
        }
    }
}

/// 叶子节点在某个字段值上的一次匹配
struct FieldMatch {
    field: Field,
    score: f64,
    norm: f64,
}

/// 文章搜索引擎
///
/// 对标题和标签建立索引，按搜索框状态返回筛选并排序后的文章。
/// 结果借用原始文章列表，不复制也不修改文章数据。构建开销很小，
/// 每次状态变化重新构建与复用同一实例的结果相同。
pub struct ArticleSearchEngine<'a> {
    articles: &'a [Article],
    records: Vec<IndexRecord>,
    options: SearchOptions,
}

impl<'a> ArticleSearchEngine<'a> {
    pub fn new(articles: &'a [Article]) -> Self {
        Self::with_options(articles, SearchOptions::default())
    }

    pub fn with_options(articles: &'a [Article], options: SearchOptions) -> Self {
        Self {
            articles,
            records: articles.iter().map(IndexRecord::new).collect(),
            options,
        }
    }

    pub fn articles(&self) -> &'a [Article] {
        self.articles
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// 按状态筛选文章
    pub fn filter(&self, state: &SearchState) -> Vec<&'a Article> {
        self.search(state).into_iter().map(|hit| hit.article).collect()
    }

    /// 按状态筛选文章并返回分数
    ///
    /// 没有筛选条件时按原顺序返回全部文章，分数为 0。
    pub fn search(&self, state: &SearchState) -> Vec<ScoredArticle<'a>> {
        match Query::from_state(state) {
            None => self
                .articles
                .iter()
                .enumerate()
                .map(|(position, article)| ScoredArticle {
                    article,
                    position,
                    score: 0.0,
                })
                .collect(),
            Some(query) => self.run_query(&query),
        }
    }

    /// 执行任意查询树
    pub fn run_query(&self, query: &Query) -> Vec<ScoredArticle<'a>> {
        let compiled = CompiledQuery::compile(query, &self.options);
        let mut hits = Vec::new();

        for (position, record) in self.records.iter().enumerate() {
            let mut matches = Vec::new();
            if evaluate(&compiled, record, &mut matches) {
                hits.push(ScoredArticle {
                    article: &self.articles[position],
                    position,
                    score: self.combined_score(&matches),
                });
            }
        }

        if self.options.should_sort {
            // 稳定排序，分数相同保持原顺序
            hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        }

        hits
    }

    fn combined_score(&self, matches: &[FieldMatch]) -> f64 {
        matches.iter().fold(1.0, |total, m| {
            let base = if m.score == 0.0 { f64::EPSILON } else { m.score };
            let norm = if self.options.ignore_field_norm { 1.0 } else { m.norm };
            total * base.powf(m.field.weight() * norm)
        })
    }
}

/// 求值查询树，匹配成功时把所有命中的字段追加到 `out`
fn evaluate(node: &CompiledQuery, record: &IndexRecord, out: &mut Vec<FieldMatch>) -> bool {
    match node {
        CompiledQuery::Leaf { field, searcher } => {
            let before = out.len();
            for value in record.values(*field) {
                let result = searcher.search_in(&value.text);
                if result.is_match {
                    out.push(FieldMatch {
                        field: *field,
                        score: result.score,
                        norm: value.norm,
                    });
                }
            }
            out.len() > before
        }
        CompiledQuery::And(children) => {
            let mut collected = Vec::new();
            for child in children {
                if !evaluate(child, record, &mut collected) {
                    return false;
                }
            }
            // 没有子查询的 And 不匹配任何内容
            let matched = !collected.is_empty();
            out.extend(collected);
            matched
        }
        CompiledQuery::Or(children) => {
            let before = out.len();
            for child in children {
                evaluate(child, record, out);
            }
            out.len() > before
        }
    }
}

/// 字段长度归一化：1/√词数，保留三位小数
fn field_norm(text: &str) -> f64 {
    let tokens = text.split(' ').filter(|t| !t.is_empty()).count().max(1);
    ((1.0 / (tokens as f64).sqrt()) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> Vec<Article> {
        vec![
            Article::new("Rust Basics", &["Rust"], "/blog/rust-basics/"),
            Article::new("React Hooks", &["React"], "/blog/react-hooks/"),
            Article::new("Learning MDX", &["MDX", "Learning"], "/blog/learning-mdx/"),
            Article::new("Notes without tags", &[], "/blog/notes/"),
        ]
    }

    fn slugs(found: &[&Article]) -> Vec<String> {
        found.iter().map(|a| a.slug.clone()).collect()
    }

    #[test]
    fn field_norm_by_word_count() {
        assert_eq!(field_norm("Rust"), 1.0);
        assert_eq!(field_norm("React Hooks"), 0.707);
        assert_eq!(field_norm("a  b   c d"), 0.5);
    }

    #[test]
    fn exact_score_uses_epsilon() {
        let list = articles();
        let engine = ArticleSearchEngine::new(&list);
        let hits = engine.run_query(&Query::TagMatch("rust".into()));
        assert_eq!(hits.len(), 1);
        let expected = f64::EPSILON.powf(0.5);
        assert!((hits[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn untagged_article_only_matches_by_title() {
        let list = articles();
        let engine = ArticleSearchEngine::new(&list);
        assert!(engine.run_query(&Query::TagMatch("notes".into())).is_empty());

        let hits = engine.run_query(&Query::TitleMatch("notes".into()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 3);
    }

    #[test]
    fn and_requires_every_child() {
        let list = articles();
        let engine = ArticleSearchEngine::new(&list);
        let query = Query::And(vec![
            Query::TagMatch("Learning".into()),
            Query::TitleMatch("rust".into()),
        ]);
        assert!(engine.run_query(&query).is_empty());
        assert!(engine.run_query(&Query::And(Vec::new())).is_empty());
        assert!(engine.run_query(&Query::Or(Vec::new())).is_empty());
    }

    #[test]
    fn better_match_ranks_first() {
        let list = vec![
            Article::new("Deep dive into hooks", &[], "/blog/deep/"),
            Article::new("Hooks", &[], "/blog/hooks/"),
        ];
        let engine = ArticleSearchEngine::new(&list);
        let mut state = SearchState::new();
        state.set_query("hooks");
        assert_eq!(slugs(&engine.filter(&state)), vec!["/blog/hooks/", "/blog/deep/"]);
    }

    #[test]
    fn unsorted_results_keep_collection_order() {
        let list = vec![
            Article::new("Deep dive into hooks", &[], "/blog/deep/"),
            Article::new("Hooks", &[], "/blog/hooks/"),
        ];
        let options = SearchOptions {
            should_sort: false,
            ..SearchOptions::default()
        };
        let engine = ArticleSearchEngine::with_options(&list, options);
        let mut state = SearchState::new();
        state.set_query("hooks");
        assert_eq!(slugs(&engine.filter(&state)), vec!["/blog/deep/", "/blog/hooks/"]);
    }

    #[test]
    fn equal_scores_keep_collection_order() {
        let list = vec![
            Article::new("Second", &["Rust"], "/blog/b/"),
            Article::new("First", &["Rust"], "/blog/a/"),
        ];
        let engine = ArticleSearchEngine::new(&list);
        let mut state = SearchState::new();
        state.toggle_tag("Rust");
        assert_eq!(slugs(&engine.filter(&state)), vec!["/blog/b/", "/blog/a/"]);
    }

    #[test]
    fn empty_collection_yields_empty_results() {
        let list: Vec<Article> = Vec::new();
        let engine = ArticleSearchEngine::new(&list);
        let mut state = SearchState::new();
        assert!(engine.filter(&state).is_empty());
        state.set_query("rust");
        assert!(engine.filter(&state).is_empty());
    }
}
