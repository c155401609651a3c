//! # Parser 模块
//!
//! 两阶段剧本解析器实现（手写，无 regex 依赖）。
//!
//! ## 架构
//!
//! ```text
//! 原始文本 → [阶段1: 行分类] → Vec<ClassifiedLine> → [阶段2: 结构组装] → ScriptDocument
//! ```
//!
//! ## 设计原则
//!
//! - 纯函数：不做 IO，同样的文本和配置总是得到同样的文档
//! - 容错解析：不丢行，无法识别的说话者按延续文本处理并记录警告
//! - 唯一的硬错误是找不到任何幕标题
//!
//! ## 模块结构
//!
//! - `helpers`: 辅助解析函数
//! - `phase1`: 行分类
//! - `phase2`: 结构组装

mod helpers;
mod phase1;
mod phase2;


use crate::config::ParserConfig;
use crate::diagnostic::Diagnostic;
use crate::error::ParseError;
use crate::recognizer::SpeakerRecognizer;
use crate::script::ast::ScriptDocument;

use phase1::classify_lines;
use phase2::DocumentBuilder;

// 重新导出辅助函数供测试使用
pub use helpers::{
    parse_heading, parse_ordinal, parse_roman, split_attribution, starts_with_ignore_case,
    strip_parenthetical, to_roman,
};

/// 剧本解析器
pub struct Parser {
    config: ParserConfig,
    recognizer: Box<dyn SpeakerRecognizer>,
    /// 上一次解析的警告
    warnings: Vec<Diagnostic>,
}

impl Parser {
    /// 使用默认配置创建解析器
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// 使用指定配置创建解析器
    pub fn with_config(config: ParserConfig) -> Self {
        let recognizer = config.recognizer.build();
        Self {
            config,
            recognizer,
            warnings: Vec::new(),
        }
    }

    /// 替换说话者识别器（覆盖配置中的 `recognizer`）
    pub fn with_recognizer(mut self, recognizer: impl SpeakerRecognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    /// 解析剧本文本
    ///
    /// # 参数
    ///
    /// - `title`: 剧本标题
    /// - `text`: 剧本文本内容
    ///
    /// # 返回
    ///
    /// 解析后的 `ScriptDocument`；没有任何幕标题时返回 `ParseError::MalformedScript`
    pub fn parse(&mut self, title: &str, text: &str) -> Result<ScriptDocument, ParseError> {
        self.warnings.clear();

        // 阶段 1：行分类
        let classified = classify_lines(text, &self.config);

        // 阶段 2：结构组装
        let builder = DocumentBuilder::new(title, self.recognizer.as_ref());
        let (doc, warnings) = builder.build(classified)?;
        self.warnings = warnings;

        Ok(doc)
    }

    /// 获取上一次解析的警告
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
