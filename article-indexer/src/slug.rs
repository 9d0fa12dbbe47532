use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path};

/// 文章页面的URL前缀
pub const BLOG_PATH: &str = "/blog";

/// 文件名中的日期前缀片段，例如 `2019-01-15-` 中的 `2019-`、`01-`、`15-`
static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+-").unwrap());

/// 由文章相对于源目录的路径生成页面路径
///
/// `2019-01-15-react-hooks.md` 和 `2019-01-15-react-hooks/index.mdx`
/// 都得到 `/blog/react-hooks/`。
pub fn derive_slug(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(last);
        // index 文件使用所在目录的路径
        if stem != "index" {
            parts.push(stem);
        }
    }

    let joined = parts.join("/");
    let name = match DATE_PREFIX.find_iter(&joined).last() {
        Some(m) => &joined[m.end()..],
        None => joined.as_str(),
    };

    let name = name.trim_matches('/');
    if name.is_empty() {
        format!("{}/", BLOG_PATH)
    } else {
        format!("{}/{}/", BLOG_PATH, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(path: &str) -> String {
        derive_slug(Path::new(path))
    }

    #[test]
    fn date_prefix_is_removed() {
        assert_eq!(slug("2019-01-15-react-hooks.md"), "/blog/react-hooks/");
        assert_eq!(slug("2019-01-15-react-hooks/index.mdx"), "/blog/react-hooks/");
    }

    #[test]
    fn plain_names_are_kept() {
        assert_eq!(slug("rust-basics.md"), "/blog/rust-basics/");
        assert_eq!(slug("rust-basics/index.md"), "/blog/rust-basics/");
        assert_eq!(slug("notes/learning-mdx.mdx"), "/blog/notes/learning-mdx/");
    }

    #[test]
    fn only_the_last_numbered_segment_counts() {
        assert_eq!(slug("2020/05-intro/part-2-hooks.md"), "/blog/hooks/");
        assert_eq!(slug("es2015.md"), "/blog/es2015/");
    }

    #[test]
    fn root_index() {
        assert_eq!(slug("index.md"), "/blog/");
        assert_eq!(slug("index.mdx"), "/blog/");
    }
}
