pub mod compression;
pub mod error;
pub mod models;
pub mod text;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{from_binary, from_compressed, to_binary, to_compressed, validate_compressed_data};
pub use error::IndexError;
pub use models::{Article, IndexType};
pub use text::kebab_case;
