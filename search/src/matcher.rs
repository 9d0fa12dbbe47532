use crate::bitap::BitapSearch;
use crate::extended::{ExactOp, ExtendedSearch};
use crate::models::SearchOptions;

/// 单次匹配结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub is_match: bool,
    /// 0 为完全匹配，1 为不匹配
    pub score: f64,
}

impl MatchResult {
    pub const NO_MATCH: MatchResult = MatchResult { is_match: false, score: 1.0 };
    pub const EXACT: MatchResult = MatchResult { is_match: true, score: 0.0 };

    pub(crate) fn from_bool(is_match: bool) -> Self {
        if is_match {
            Self::EXACT
        } else {
            Self::NO_MATCH
        }
    }
}

/// 近似字符串匹配器：模式在构造时确定，对多个文本重复匹配
pub trait Searcher {
    fn search_in(&self, text: &str) -> MatchResult;
}

/// 按配置选择匹配器
pub fn create_searcher(pattern: &str, options: &SearchOptions) -> Box<dyn Searcher> {
    if options.use_extended_search {
        Box::new(ExtendedSearch::new(pattern, options.clone()))
    } else {
        Box::new(BitapSearch::new(pattern, options.clone()))
    }
}

/// 整个文本与模式完全相等才匹配，大小写规则与其他匹配器相同
pub struct ExactSearch {
    pattern: String,
    options: SearchOptions,
}

impl ExactSearch {
    pub fn new(pattern: &str, options: SearchOptions) -> Self {
        Self {
            pattern: normalize_case(pattern, &options),
            options,
        }
    }
}

impl Searcher for ExactSearch {
    fn search_in(&self, text: &str) -> MatchResult {
        let text = normalize_case(text, &self.options);
        MatchResult::from_bool(!self.pattern.is_empty() && ExactOp::Equal.test(&text, &self.pattern))
    }
}

/// 不区分大小写时统一转为小写
pub(crate) fn normalize_case(text: &str, options: &SearchOptions) -> String {
    if options.is_case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_searcher_from_options() {
        let extended = create_searcher("=rust", &SearchOptions::default());
        assert!(extended.search_in("Rust").is_match);
        assert!(!extended.search_in("Rusty").is_match);

        let plain = create_searcher(
            "=rust",
            &SearchOptions {
                use_extended_search: false,
                ..SearchOptions::default()
            },
        );
        // 不启用扩展语法时 `=` 只是普通字符
        assert_eq!(plain.search_in("=Rust"), MatchResult::EXACT);
        assert!(!plain.search_in("python").is_match);
    }

    #[test]
    fn exact_search_compares_whole_text() {
        let rust = ExactSearch::new("Rust", SearchOptions::default());
        assert_eq!(rust.search_in("rust"), MatchResult::EXACT);
        assert!(!rust.search_in("Trust").is_match);
        assert!(!rust.search_in("Rustacean").is_match);

        let spaced = ExactSearch::new("C | C++", SearchOptions::default());
        assert!(spaced.search_in("c | c++").is_match);
        assert!(!spaced.search_in("c").is_match);

        assert!(!ExactSearch::new("", SearchOptions::default()).search_in("").is_match);
    }
}
