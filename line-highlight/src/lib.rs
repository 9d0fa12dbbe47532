use wasm_bindgen::prelude::*;
use web_sys::console;

pub mod code_block;
pub mod range;

pub use code_block::{language_from_class, visible_line_count, CodeBlock};
pub use range::{highlight_predicate, HighlightSpec, LineRange, ParseError};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 代码块高亮JS接口 - 每个代码块渲染时创建一次
#[wasm_bindgen]
pub struct CodeBlockJS {
    block: CodeBlock,
}

#[wasm_bindgen]
impl CodeBlockJS {
    #[wasm_bindgen(constructor)]
    pub fn new(class_name: Option<String>, metastring: Option<String>) -> CodeBlockJS {
        // 注释格式错误时不中断渲染，只记录日志
        if let Err(e) = HighlightSpec::parse(metastring.as_deref()) {
            console::warn_1(&JsValue::from_str(&format!("忽略代码块高亮注释: {}", e)));
        }

        CodeBlockJS {
            block: CodeBlock::new(class_name.as_deref(), metastring.as_deref()),
        }
    }

    /// 代码语言
    #[wasm_bindgen(getter)]
    pub fn language(&self) -> String {
        self.block.language.clone()
    }

    /// 判断 0 起始的行是否需要高亮
    pub fn should_highlight_line(&self, index: usize) -> bool {
        self.block.highlight.contains(index)
    }

    /// 所有行的 CSS 类名
    pub fn line_classes(&self, line_count: usize) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.block.line_classes(line_count))
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }

    /// 解析出的行号范围
    pub fn ranges(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.block.highlight.ranges().to_vec())
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }
}

/// 严格解析：注释格式错误时返回错误
#[wasm_bindgen]
pub fn parse_highlight_ranges(metastring: Option<String>) -> Result<JsValue, JsValue> {
    let spec = HighlightSpec::parse(metastring.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&spec.ranges().to_vec())
        .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}
