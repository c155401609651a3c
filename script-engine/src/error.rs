//! # Error 模块
//!
//! 定义 script-engine 中使用的错误类型。
//!
//! 所有错误都是本地、同步的失败，直接返回给调用方，不做重试。

use thiserror::Error;

/// 解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 文本中找不到任何幕标题，不像是剧本
    #[error("无法分析 '{title}'：文本中没有任何幕（act）标题")]
    MalformedScript { title: String },
}

/// 分析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 没有识别出任何说话角色
    #[error("无法分析 '{title}'：没有识别出任何说话角色")]
    NoCharactersFound { title: String },
}

/// 对比方位（A / B）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// 对比错误
///
/// 只在输入缺失或结构不完整时出现；由 [`crate::analyze`] 正常产生的分析结果不会触发。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    /// 某一侧没有分析结果
    #[error("无法对比：缺少 {side} 侧的分析结果")]
    MissingAnalysis { side: Side },

    /// 分析结果结构不完整
    #[error("无法对比 {side} 侧 '{title}'：{reason}")]
    IncomparableAnalyses {
        side: Side,
        title: String,
        reason: String,
    },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("配置 JSON 解析失败: {0}")]
    InvalidJson(String),

    /// 配置值无效
    #[error("配置验证失败: {0}")]
    Invalid(String),
}

/// script-engine 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 分析错误
    #[error("分析错误: {0}")]
    Analysis(#[from] AnalysisError),

    /// 对比错误
    #[error("对比错误: {0}")]
    Compare(#[from] CompareError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
