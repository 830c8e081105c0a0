//! 错误类型
//!
//! 输入校验错误使用 `thiserror` 定义；应用级错误（配置、终端、日志）统一走 `anyhow`。

use std::num::ParseIntError;

use thiserror::Error;

/// 用户输入错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// 数量无法解析为非负整数
    #[error("数量无效: '{input}' 不是非负整数")]
    InvalidQuantity {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// 解析数量文本（允许首尾空白）
pub fn parse_quantity(text: &str) -> Result<u32, InputError> {
    text.trim()
        .parse::<u32>()
        .map_err(|source| InputError::InvalidQuantity {
            input: text.to_string(),
            source,
        })
}
