use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// 代码块注释中的行号范围，例如 `{1,3-5}`
static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([\d,-]+)\}").unwrap());

/// 行号范围解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("无效的行号片段: {token:?}")]
    MalformedToken { token: String },
    #[error("行号超出范围: {token:?}")]
    Overflow { token: String },
}

/// 单个行号范围（1 起始，闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: u32,
    /// `None` 表示只有单独一行
    pub end: Option<u32>,
}

impl LineRange {
    fn contains_line(&self, line: u64) -> bool {
        match self.end {
            None => line == u64::from(self.start),
            Some(end) => u64::from(self.start) <= line && line <= u64::from(end),
        }
    }
}

/// 从注释字符串解析出的高亮行集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSpec {
    ranges: Vec<LineRange>,
}

impl HighlightSpec {
    /// 解析代码块的 meta 字符串
    ///
    /// 找不到 `{...}` 时返回空集合；花括号内存在无法解析的片段时整个注释作废。
    pub fn parse(meta: Option<&str>) -> Result<Self, ParseError> {
        let Some(meta) = meta else {
            return Ok(Self::default());
        };

        let Some(captures) = RANGE_PATTERN.captures(meta) else {
            return Ok(Self::default());
        };

        let ranges = captures[1]
            .split(',')
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ranges })
    }

    /// 渲染时使用的版本：解析失败时退化为不高亮
    pub fn parse_lossy(meta: Option<&str>) -> Self {
        Self::parse(meta).unwrap_or_default()
    }

    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// 判断 0 起始的行索引是否需要高亮
    pub fn contains(&self, index: usize) -> bool {
        let line = index as u64 + 1;
        self.ranges.iter().any(|range| range.contains_line(line))
    }
}

/// 根据 meta 字符串生成行高亮判断函数
pub fn highlight_predicate(meta: Option<&str>) -> impl Fn(usize) -> bool {
    let spec = HighlightSpec::parse_lossy(meta);
    move |index| spec.contains(index)
}

fn parse_token(token: &str) -> Result<LineRange, ParseError> {
    match token.split_once('-') {
        None => Ok(LineRange {
            start: parse_number(token, token)?,
            end: None,
        }),
        Some((first, second)) => {
            let first = parse_number(first, token)?;
            let second = parse_number(second, token)?;
            // 反向范围 5-3 视为 3-5
            Ok(LineRange {
                start: first.min(second),
                end: Some(first.max(second)),
            })
        }
    }
}

fn parse_number(part: &str, token: &str) -> Result<u32, ParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MalformedToken {
            token: token.to_string(),
        });
    }
    part.parse().map_err(|_| ParseError::Overflow {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(meta: &str, count: usize) -> Vec<bool> {
        let predicate = highlight_predicate(Some(meta));
        (0..count).map(predicate).collect()
    }

    #[test]
    fn single_and_range_tokens() {
        assert_eq!(
            lines("{2,4-6}", 8),
            vec![false, true, false, true, true, true, false, false]
        );
        assert_eq!(lines("{1}", 3), vec![true, false, false]);
    }

    #[test]
    fn annotation_may_sit_between_other_meta() {
        let spec = HighlightSpec::parse(Some("title=main.rs {3} showLineNumbers")).unwrap();
        assert_eq!(spec.ranges(), &[LineRange { start: 3, end: None }]);
        assert!(spec.contains(2));
    }

    #[test]
    fn missing_annotation_never_highlights() {
        for meta in [None, Some(""), Some("{}"), Some("{a,b}"), Some("title=x")] {
            let spec = HighlightSpec::parse(meta).unwrap();
            assert!(spec.is_empty());
            assert!((0..10_000).all(|i| !spec.contains(i)));
        }
    }

    #[test]
    fn reversed_range_is_normalized() {
        assert_eq!(lines("{4-2}", 5), vec![false, true, true, true, false]);
    }

    #[test]
    fn malformed_tokens_reject_the_annotation() {
        assert_eq!(
            HighlightSpec::parse(Some("{1,,3}")),
            Err(ParseError::MalformedToken { token: String::new() })
        );
        assert_eq!(
            HighlightSpec::parse(Some("{2-}")),
            Err(ParseError::MalformedToken { token: "2-".into() })
        );
        assert_eq!(
            HighlightSpec::parse(Some("{1-2-3}")),
            Err(ParseError::MalformedToken { token: "1-2-3".into() })
        );
        assert!(matches!(
            HighlightSpec::parse(Some("{99999999999}")),
            Err(ParseError::Overflow { .. })
        ));
    }

    #[test]
    fn lossy_parse_degrades_to_no_highlight() {
        assert!(HighlightSpec::parse_lossy(Some("{1,-}")).is_empty());
        assert_eq!(lines("{-3}", 4), vec![false; 4]);
    }

    #[test]
    fn line_zero_matches_nothing() {
        assert_eq!(lines("{0}", 3), vec![false; 3]);
    }
}
