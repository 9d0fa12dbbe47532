use crate::state::SearchState;

/// 完全相等匹配的前缀
const EXACT_PREFIX: &str = "=";

/// 可搜索的文章字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Tags,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Tags];

    /// 归一化后的字段权重，所有字段权重相同
    pub fn weight(self) -> f64 {
        1.0 / Field::ALL.len() as f64
    }
}

/// 组合查询树
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// 在标签中匹配
    TagMatch(String),
    /// 在标题中匹配
    TitleMatch(String),
    /// 所有子查询都要匹配
    And(Vec<Query>),
    /// 任一子查询匹配即可
    Or(Vec<Query>),
}

impl Query {
    /// 根据搜索框状态构建查询，没有筛选条件时返回 `None`
    ///
    /// 结构为 `Or[Tag(text), Title(text), And[Tag(="t")..., Title(text)]]`，
    /// 已选标签要求完全相等，文本为空时省略以文本为模式的叶子（空模式不会匹配任何内容）。
    pub fn from_state(state: &SearchState) -> Option<Query> {
        if state.is_empty() {
            return None;
        }

        let text = state.query_text.as_str();
        let mut branches = Vec::with_capacity(3);

        if !text.is_empty() {
            branches.push(Query::TagMatch(text.to_string()));
            branches.push(Query::TitleMatch(text.to_string()));
        }

        let mut all_of: Vec<Query> = state
            .selected_tags
            .iter()
            .map(|tag| Query::tag_is(tag))
            .collect();
        if !text.is_empty() {
            all_of.push(Query::TitleMatch(text.to_string()));
        }
        branches.push(Query::And(all_of));

        Some(Query::Or(branches))
    }

    /// 标签完全相等，写作扩展语法的 `="tag"`
    pub fn tag_is(tag: &str) -> Query {
        Query::TagMatch(format!("{}\"{}\"", EXACT_PREFIX, tag))
    }

    /// `="..."` 形式的模式中引号内的值
    ///
    /// 编译时直接按完全相等处理，标签里的 `|`、空格和引号不再经过扩展语法拆分。
    pub fn exact_value(pattern: &str) -> Option<&str> {
        pattern
            .strip_prefix(EXACT_PREFIX)?
            .strip_prefix('"')?
            .strip_suffix('"')
            .filter(|value| !value.is_empty())
    }

    /// 叶子节点对应的字段和模式
    pub fn leaf(&self) -> Option<(Field, &str)> {
        match self {
            Query::TagMatch(pattern) => Some((Field::Tags, pattern.as_str())),
            Query::TitleMatch(pattern) => Some((Field::Title, pattern.as_str())),
            Query::And(_) | Query::Or(_) => None,
        }
    }
}
