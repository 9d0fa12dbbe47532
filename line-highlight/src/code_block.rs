use serde::Serialize;

use crate::range::HighlightSpec;

/// 普通代码行的 CSS 类名
pub const LINE_CLASS: &str = "token-line";
/// 高亮行追加的 CSS 类名
pub const HIGHLIGHT_CLASS: &str = "highlight-line";

/// 代码块渲染所需的信息：语言和高亮行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: String,
    pub highlight: HighlightSpec,
}

impl CodeBlock {
    /// 从 `className`（如 `language-rust`）和 meta 字符串构建
    pub fn new(class_name: Option<&str>, meta: Option<&str>) -> Self {
        Self {
            language: language_from_class(class_name.unwrap_or_default()),
            highlight: HighlightSpec::parse_lossy(meta),
        }
    }

    /// 每一行对应的 CSS 类名
    pub fn line_classes(&self, line_count: usize) -> Vec<String> {
        (0..line_count)
            .map(|index| {
                if self.highlight.contains(index) {
                    format!("{} {}", LINE_CLASS, HIGHLIGHT_CLASS)
                } else {
                    LINE_CLASS.to_string()
                }
            })
            .collect()
    }
}

/// 提取 `language-xxx` 中的语言名，没有前缀时返回空字符串
pub fn language_from_class(class_name: &str) -> String {
    class_name
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .unwrap_or_default()
        .to_string()
}

/// 需要渲染的行数
///
/// 代码以换行结尾时分词器会多产生一个空行，这一行不渲染。
pub fn visible_line_count<S: AsRef<str>>(lines: &[S]) -> usize {
    match lines.last() {
        Some(last) if last.as_ref().is_empty() => lines.len() - 1,
        _ => lines.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_taken_from_class_prefix() {
        assert_eq!(language_from_class("language-rust"), "rust");
        assert_eq!(language_from_class("block language-jsx"), "jsx");
        assert_eq!(language_from_class("plain"), "");
        assert_eq!(language_from_class(""), "");
    }

    #[test]
    fn line_classes_mark_highlighted_lines() {
        let block = CodeBlock::new(Some("language-js"), Some("{2}"));
        assert_eq!(block.language, "js");
        assert_eq!(
            block.line_classes(3),
            vec!["token-line", "token-line highlight-line", "token-line"]
        );
    }

    #[test]
    fn malformed_meta_renders_plain_lines() {
        let block = CodeBlock::new(None, Some("{3-}"));
        assert_eq!(block.language, "");
        assert!(block.highlight.is_empty());
    }

    #[test]
    fn trailing_empty_line_is_hidden() {
        let code = "fn main() {}\n";
        let lines: Vec<&str> = code.split('\n').collect();
        assert_eq!(visible_line_count(&lines), 1);
        assert_eq!(visible_line_count(&["a", "", "b"]), 3);
        assert_eq!(visible_line_count::<&str>(&[]), 0);
    }
}
