use thiserror::Error;

/// 索引读写与构建过程中的错误
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("数据太短，无法解析: {0} 字节")]
    TooShort(usize),

    #[error("无效的文件格式：魔数不匹配")]
    BadMagic,

    #[error("不支持的版本: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("解压后数据大小不匹配: 期望 {expected} 字节, 实际 {actual} 字节")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("序列化失败: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("反序列化失败: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("无法构建索引: 没有文章数据")]
    Empty,

    #[error("重复的文章路径: {0}")]
    DuplicateSlug(String),

    #[error("front matter 解析失败 {path}: {message}")]
    FrontMatter { path: String, message: String },
}
