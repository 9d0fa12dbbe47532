use wasm_bindgen::prelude::*;
use web_sys::console;
use utils_common::compression::from_compressed_with_max_version;
use utils_common::models::{Article, IndexType};

pub mod bitap;
pub mod engine;
pub mod extended;
pub mod matcher;
pub mod models;
pub mod query;
pub mod state;

pub use engine::ArticleSearchEngine;
pub use matcher::{create_searcher, MatchResult, Searcher};
pub use models::{ScoredArticle, SearchBoxConfig, SearchOptions, DEFAULT_TOPICS};
pub use query::{Field, Query};
pub use state::SearchState;

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

/// 文章搜索框JS接口
///
/// 持有文章列表、搜索状态和配置，页面在输入或点击标签后调用 `filter` 重新渲染列表。
#[wasm_bindgen]
pub struct SearchBoxJS {
    articles: Vec<Article>,
    state: SearchState,
    config: SearchBoxConfig,
}

#[wasm_bindgen]
impl SearchBoxJS {
    /// 使用页面查询到的文章数组创建搜索框，`config` 可省略
    #[wasm_bindgen(constructor)]
    pub fn new(articles: JsValue, config: JsValue) -> Result<SearchBoxJS, JsValue> {
        console_error_panic_hook::set_once();

        let articles: Vec<Article> = serde_wasm_bindgen::from_value(articles)
            .map_err(|e| JsValue::from_str(&format!("解析文章列表失败: {}", e)))?;

        let config = if config.is_undefined() || config.is_null() {
            SearchBoxConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("解析搜索配置失败: {}", e)))?
        };

        Ok(SearchBoxJS {
            articles,
            state: SearchState::new(),
            config,
        })
    }

    /// 从索引生成器输出的 `articles.bin` 创建搜索框
    pub fn from_index(index_data: &[u8]) -> Result<SearchBoxJS, JsValue> {
        console_error_panic_hook::set_once();

        let max_version = IndexType::Articles.version()[0];
        let articles: Vec<Article> = from_compressed_with_max_version(index_data, max_version)
            .map_err(|e| {
                console::log_1(&JsValue::from_str(&format!("文章索引解析失败: {}", e)));
                JsValue::from_str(&format!("解析文章索引失败: {}", e))
            })?;

        Ok(SearchBoxJS {
            articles,
            state: SearchState::new(),
            config: SearchBoxConfig::default(),
        })
    }

    /// 标签按钮列表
    pub fn topics(&self) -> js_sys::Array {
        self.config
            .topics
            .iter()
            .map(|topic| JsValue::from_str(topic))
            .collect()
    }

    /// 当前输入的文本
    #[wasm_bindgen(getter)]
    pub fn query(&self) -> String {
        self.state.query_text.clone()
    }

    /// 更新输入的文本
    pub fn set_query(&mut self, text: String) {
        self.state.set_query(text);
    }

    /// 切换标签选中状态，返回切换后是否选中
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.state.toggle_tag(tag)
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.state.is_selected(tag)
    }

    /// 从 `location.search` 恢复状态
    pub fn restore(&mut self, query_string: &str) {
        self.state = SearchState::from_query_string(query_string);
    }

    /// 当前状态对应的查询字符串，用于 `history.replaceState`
    pub fn query_string(&self) -> String {
        self.state.to_query_string()
    }

    /// 按当前状态筛选文章
    pub fn filter(&self) -> Result<JsValue, JsValue> {
        let engine = ArticleSearchEngine::with_options(&self.articles, self.config.options.clone());
        let results = engine.filter(&self.state);

        serde_wasm_bindgen::to_value(&results)
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }

    /// 按当前状态筛选文章，附带相关度分数
    pub fn search(&self) -> Result<JsValue, JsValue> {
        let engine = ArticleSearchEngine::with_options(&self.articles, self.config.options.clone());
        let results = engine.search(&self.state);

        serde_wasm_bindgen::to_value(&results)
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }
}
