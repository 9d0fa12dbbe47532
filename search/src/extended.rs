//! 扩展查询语法
//!
//! 空格分隔的词条为 AND，`|` 分隔的分组为 OR。词条前后缀决定匹配方式：
//!
//! | 写法 | 含义 |
//! |---|---|
//! | `jscript` | 模糊匹配 |
//! | `=scheme` | 完全相等 |
//! | `'python` | 包含 |
//! | `^java` | 以此开头 |
//! | `!ruby` | 不包含 |
//! | `!^earlang` | 不以此开头 |
//! | `.js$` | 以此结尾 |
//! | `!.go$` | 不以此结尾 |
//!
//! 用双引号包裹的词条可以包含空格，例如 `="react hooks"`。

use crate::bitap::BitapSearch;
use crate::matcher::{normalize_case, MatchResult, Searcher};
use crate::models::SearchOptions;

const OR_TOKEN: char = '|';

/// 单个词条的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Exact,
    Include,
    PrefixExact,
    InversePrefixExact,
    InverseSuffixExact,
    SuffixExact,
    InverseExact,
    Fuzzy,
}

impl TokenKind {
    /// 解析顺序，前面的写法优先
    const ALL: [TokenKind; 8] = [
        TokenKind::Exact,
        TokenKind::Include,
        TokenKind::PrefixExact,
        TokenKind::InversePrefixExact,
        TokenKind::InverseSuffixExact,
        TokenKind::SuffixExact,
        TokenKind::InverseExact,
        TokenKind::Fuzzy,
    ];

    fn affixes(self) -> (&'static str, &'static str) {
        match self {
            TokenKind::Exact => ("=", ""),
            TokenKind::Include => ("'", ""),
            TokenKind::PrefixExact => ("^", ""),
            TokenKind::InversePrefixExact => ("!^", ""),
            TokenKind::InverseSuffixExact => ("!", "$"),
            TokenKind::SuffixExact => ("", "$"),
            TokenKind::InverseExact => ("!", ""),
            TokenKind::Fuzzy => ("", ""),
        }
    }

    /// 带引号的写法，例如 `="a b"`
    fn match_quoted(self, item: &str) -> Option<&str> {
        let (prefix, suffix) = self.affixes();
        let body = item.strip_prefix(prefix)?.strip_suffix(suffix)?;
        let inner = body.strip_prefix('"')?.strip_suffix('"')?;
        (!inner.is_empty()).then_some(inner)
    }

    fn match_plain(self, item: &str) -> Option<&str> {
        let (prefix, suffix) = self.affixes();
        let inner = item.strip_prefix(prefix)?.strip_suffix(suffix)?;
        (!inner.is_empty()).then_some(inner)
    }

    /// 非模糊的写法对应的比较方式
    fn exact_op(self) -> Option<ExactOp> {
        match self {
            TokenKind::Exact => Some(ExactOp::Equal),
            TokenKind::Include => Some(ExactOp::Include),
            TokenKind::PrefixExact => Some(ExactOp::Prefix),
            TokenKind::InversePrefixExact => Some(ExactOp::InversePrefix),
            TokenKind::InverseSuffixExact => Some(ExactOp::InverseSuffix),
            TokenKind::SuffixExact => Some(ExactOp::Suffix),
            TokenKind::InverseExact => Some(ExactOp::InverseInclude),
            TokenKind::Fuzzy => None,
        }
    }
}

/// 精确比较，不计算模糊分数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactOp {
    Equal,
    Include,
    Prefix,
    InversePrefix,
    InverseSuffix,
    Suffix,
    InverseInclude,
}

impl ExactOp {
    pub fn test(self, text: &str, pattern: &str) -> bool {
        match self {
            ExactOp::Equal => text == pattern,
            ExactOp::Include => text.contains(pattern),
            ExactOp::Prefix => text.starts_with(pattern),
            ExactOp::InversePrefix => !text.starts_with(pattern),
            ExactOp::InverseSuffix => !text.ends_with(pattern),
            ExactOp::Suffix => text.ends_with(pattern),
            ExactOp::InverseInclude => !text.contains(pattern),
        }
    }
}

enum TokenSearcher {
    Exact(ExactOp, String),
    Fuzzy(BitapSearch),
}

impl TokenSearcher {
    fn new(kind: TokenKind, token: &str, options: &SearchOptions) -> Self {
        match kind.exact_op() {
            Some(op) => TokenSearcher::Exact(op, token.to_string()),
            None => TokenSearcher::Fuzzy(BitapSearch::new(token, options.clone())),
        }
    }

    fn search(&self, text: &str) -> MatchResult {
        match self {
            TokenSearcher::Fuzzy(bitap) => bitap.search_in(text),
            TokenSearcher::Exact(op, pattern) => MatchResult::from_bool(op.test(text, pattern)),
        }
    }
}

/// 支持扩展语法的匹配器
pub struct ExtendedSearch {
    query: Vec<Vec<TokenSearcher>>,
    options: SearchOptions,
}

impl ExtendedSearch {
    pub fn new(pattern: &str, options: SearchOptions) -> Self {
        let pattern = normalize_case(pattern, &options);
        let query = parse_query(&pattern)
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|(kind, token)| TokenSearcher::new(kind, &token, &options))
                    .collect()
            })
            .collect();

        Self { query, options }
    }
}

impl Searcher for ExtendedSearch {
    fn search_in(&self, text: &str) -> MatchResult {
        let text = normalize_case(text, &self.options);

        // 第一个全部词条都匹配的 OR 分组决定结果
        for group in &self.query {
            let mut total_score = 0.0;
            let mut matched = 0;

            for searcher in group {
                let result = searcher.search(&text);
                if !result.is_match {
                    matched = 0;
                    break;
                }
                matched += 1;
                total_score += result.score;
            }

            if matched > 0 {
                return MatchResult {
                    is_match: true,
                    score: total_score / matched as f64,
                };
            }
        }

        MatchResult::NO_MATCH
    }
}

/// 将查询拆成 OR 分组，每组内为 AND 的词条
pub fn parse_query(pattern: &str) -> Vec<Vec<(TokenKind, String)>> {
    pattern
        .split(OR_TOKEN)
        .map(|group| {
            split_outside_quotes(group.trim())
                .into_iter()
                .filter_map(|item| classify(item).map(|(kind, token)| (kind, token.to_string())))
                .collect()
        })
        .collect()
}

fn classify(item: &str) -> Option<(TokenKind, &str)> {
    TokenKind::ALL
        .iter()
        .find_map(|&kind| kind.match_quoted(item).map(|token| (kind, token)))
        .or_else(|| {
            TokenKind::ALL
                .iter()
                .find_map(|&kind| kind.match_plain(item).map(|token| (kind, token)))
        })
}

/// 按空格拆分，引号内的空格保留
fn split_outside_quotes(group: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in group.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                items.push(&group[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&group[start..]);

    items.into_iter().filter(|item| !item.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extended(pattern: &str) -> ExtendedSearch {
        ExtendedSearch::new(pattern, SearchOptions::default())
    }

    #[test]
    fn classifies_operators() {
        let parsed = parse_query("=rust 'hook ^lea !^java .mdx$ !.go$ !vue fuzzy");
        let kinds: Vec<TokenKind> = parsed[0].iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Exact,
                TokenKind::Include,
                TokenKind::PrefixExact,
                TokenKind::InversePrefixExact,
                TokenKind::SuffixExact,
                TokenKind::InverseSuffixExact,
                TokenKind::InverseExact,
                TokenKind::Fuzzy,
            ]
        );
        assert_eq!(parsed[0][4].1, ".mdx");
        assert_eq!(parsed[0][5].1, ".go");
    }

    #[test]
    fn quoted_tokens_keep_spaces() {
        let parsed = parse_query("=\"react hooks\" rust");
        assert_eq!(parsed[0][0], (TokenKind::Exact, "react hooks".to_string()));
        assert_eq!(parsed[0][1], (TokenKind::Fuzzy, "rust".to_string()));
        assert!(extended("=\"react hooks\"").search_in("React Hooks").is_match);
    }

    #[test]
    fn bare_operator_falls_back_to_fuzzy() {
        assert_eq!(parse_query("=")[0], vec![(TokenKind::Fuzzy, "=".to_string())]);
    }

    #[test]
    fn and_within_group_or_across_groups() {
        let both = extended("^react hooks");
        assert!(both.search_in("React Hooks").is_match);
        assert!(!both.search_in("Rust Basics").is_match);

        let either = extended("=rust | =react");
        assert_eq!(either.search_in("React"), MatchResult::EXACT);
        assert!(either.search_in("rust").is_match);
        assert!(!either.search_in("mdx").is_match);
    }

    #[test]
    fn inverse_tokens() {
        assert!(extended("!rust").search_in("React").is_match);
        assert!(!extended("!rust").search_in("Rust Basics").is_match);
        assert!(!extended("!^rust").search_in("Rust Basics").is_match);
        assert!(extended("!basics$").search_in("Rust Hooks").is_match);
    }

    #[test]
    fn operators_map_to_exact_comparisons() {
        assert_eq!(TokenKind::Fuzzy.exact_op(), None);
        assert_eq!(TokenKind::Exact.exact_op(), Some(ExactOp::Equal));
        assert!(ExactOp::Suffix.test("learning mdx", "mdx"));
        assert!(!ExactOp::InverseSuffix.test("learning mdx", "mdx"));
        assert!(ExactOp::InversePrefix.test("react", "rust"));
    }

    #[test]
    fn empty_pattern_never_matches() {
        assert_eq!(extended("").search_in(""), MatchResult::NO_MATCH);
        assert_eq!(extended("   ").search_in("rust"), MatchResult::NO_MATCH);
    }

    #[test]
    fn fuzzy_token_score_is_averaged() {
        let result = extended("hooks").search_in("React Hooks");
        assert!(result.is_match);
        assert!((result.score - 0.06).abs() < 1e-9);
    }
}
