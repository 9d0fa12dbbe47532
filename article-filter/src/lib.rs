use wasm_bindgen::prelude::*;
use web_sys::console;
use utils_common::models::Article;

// 导出模块
pub mod models;
pub mod builder;

pub use builder::FilterBuilder;
pub use models::{newest_first, tag_header, tag_path, TagIndex, TagPage};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 标签筛选JS接口 - 每个实例持有一份标签索引
#[wasm_bindgen]
pub struct ArticleFilterJS {
    index: TagIndex,
}

#[wasm_bindgen]
impl ArticleFilterJS {
    /// 从 `tag_index.bin` 加载
    pub fn from_index(index_data: &[u8]) -> Result<ArticleFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let index = TagIndex::from_compressed(index_data).map_err(|e| {
            console::log_1(&JsValue::from_str(&format!("标签索引解析失败: {}", e)));
            JsValue::from_str(&format!("解析标签索引失败: {}", e))
        })?;

        Ok(ArticleFilterJS { index })
    }

    /// 从文章数组直接构建
    pub fn from_articles(articles: JsValue) -> Result<ArticleFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let articles: Vec<Article> = serde_wasm_bindgen::from_value(articles)
            .map_err(|e| JsValue::from_str(&format!("解析文章列表失败: {}", e)))?;

        Ok(ArticleFilterJS {
            index: TagIndex::build(articles),
        })
    }

    /// 获取所有标签
    pub fn get_all_tags(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.index.tags())
            .map_err(|e| JsValue::from_str(&format!("序列化标签失败: {}", e)))
    }

    /// 带某个标签的文章，新发布的在前
    pub fn articles_for_tag(&self, tag: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.index.articles_for_tag(tag))
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }

    /// 所有标签页数据
    pub fn tag_pages(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.index.tag_pages())
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }
}
