use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Markdown 文件头部的 YAML 元数据
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub draft: bool,
}

impl FrontMatter {
    /// 非空标题
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// 解析发布日期，没有写日期时返回 `Ok(None)`
    pub fn published(&self) -> Result<Option<DateTime<Utc>>, String> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_date(raw)
                .map(Some)
                .ok_or_else(|| format!("无效的日期: {}", raw)),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// 取出 `---` 之间的 YAML 文本，没有元数据块时返回 `None`
pub fn split_front_matter(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }

    None
}

/// 解析 Markdown 文件的元数据
pub fn parse_front_matter(content: &str) -> Result<Option<FrontMatter>, String> {
    let Some(yaml) = split_front_matter(content) else {
        return Ok(None);
    };

    if yaml.trim().is_empty() {
        return Ok(Some(FrontMatter::default()));
    }

    serde_norway::from_str(yaml)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// 支持 RFC 3339、`YYYY-MM-DD HH:MM:SS` 和 `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
