//! # Script Engine
//!
//! 剧本分析引擎：解析按幕、场、角色台词组织的剧本文本，统计结构和语言指标，
//! 并对比两部剧本的分析结果。
//!
//! ## 架构概述
//!
//! `script-engine` 是纯逻辑核心，不做 IO、不持有全局状态。
//! 宿主（界面、命令行工具）负责读取文本，并渲染返回的不可变结果：
//!
//! ```text
//! 原始文本 ──Parser──► ScriptDocument ──extract_metrics──► DocumentMetrics
//!                                                            │
//!                                         resolve_protagonist│
//!                                                            ▼
//!                       ComparisonReport ◄──compare── ScriptAnalysis ×2
//! ```
//!
//! 每一步只读取上一步的结果，不修改它。不同剧本可以在不同线程上并发分析。
//!
//! ## 使用示例
//!
//! ```ignore
//! use script_engine::{ScriptAnalyzer, compare};
//!
//! let analyzer = ScriptAnalyzer::new();
//! let a = analyzer.analyze("Hamlet", &hamlet_text)?;
//! let b = analyzer.analyze("Macbeth", &macbeth_text)?;
//!
//! println!("主角: {}", a.protagonist());
//! println!("{}", compare(&a, &b)?);
//! ```
//!
//! ## 模块结构
//!
//! - [`script`]：文档结构（AST）和两阶段解析器
//! - [`recognizer`]：说话者识别
//! - [`metrics`]：单次遍历统计
//! - [`protagonist`]：主角判定
//! - [`analysis`]：分析入口
//! - [`compare`]：分析结果对比
//! - [`diagnostic`]：解析警告与结构检查
//! - [`config`]：解析器配置
//! - [`error`]：错误类型定义

pub mod analysis;
pub mod compare;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod metrics;
pub mod protagonist;
pub mod recognizer;
pub mod script;

// 重导出核心类型
pub use analysis::{ScriptAnalysis, ScriptAnalyzer, analyze, analyze_document};
pub use compare::{
    Comparator, ComparisonReport, Metric, MetricComparison, compare, compare_optional,
};
pub use config::{ParserConfig, RecognizerConfig};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, check_document};
pub use error::{
    AnalysisError, CompareError, ConfigError, EngineError, EngineResult, ParseError, Side,
};
pub use metrics::{
    CharacterTally, DocumentMetrics, LongestSpeech, SceneSummary, extract_metrics, main_location,
};
pub use protagonist::resolve_protagonist;
pub use recognizer::{AllCapsRecognizer, CastListRecognizer, SpeakerRecognizer};
pub use script::{Act, Line, LineKind, Parser, Scene, ScriptDocument, count_words};
