//! # 诊断模块
//!
//! 解析警告与文档结构检查，不依赖 IO。
//!
//! ## 设计原则
//!
//! - 解析器对噪声输入是宽容的：不丢行，只可能错配说话者，这些情况记录为诊断而不是报错
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 结构检查复用 AST，不重复解析

use std::collections::HashMap;

use crate::script::{LineKind, ScriptDocument};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 剧本标题
    pub script_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如原始行内容）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, script_id: &str, message: String) -> Self {
        Self {
            level,
            script_id: script_id.to_string(),
            line: None,
            message,
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, script_id, message.into())
    }

    /// 创建警告诊断
    pub fn warn(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, script_id, message.into())
    }

    /// 创建信息诊断
    pub fn info(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, script_id, message.into())
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按最低级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

impl From<Vec<Diagnostic>> for DiagnosticResult {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

//=============================================================================
// 文档结构检查
//=============================================================================

/// 检查已解析的剧本结构
///
/// 执行以下检查：
/// - 没有任何场的幕（Warn）
/// - 没有任何行的场（Warn）
/// - 幕/场编号不连续（Warn）
/// - 全剧只说过一次话的角色（Info，常见于角色名拼写不一致）
pub fn check_document(doc: &ScriptDocument) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let id = doc.title.as_str();

    let mut prev_act: Option<u32> = None;
    for act in &doc.acts {
        if let Some(prev) = prev_act
            && act.number != prev + 1
        {
            result.push(
                Diagnostic::warn(id, format!("幕编号不连续：{} 之后是 {}", prev, act.number))
                    .with_detail(act.heading.clone()),
            );
        }
        prev_act = Some(act.number);

        if act.scenes.is_empty() {
            result.push(
                Diagnostic::warn(id, format!("第 {} 幕没有任何内容", act.index))
                    .with_detail(act.heading.clone()),
            );
        }

        let mut prev_scene: Option<u32> = None;
        for scene in &act.scenes {
            if let Some(number) = scene.number {
                if let Some(prev) = prev_scene
                    && number != prev + 1
                {
                    let mut diag = Diagnostic::warn(
                        id,
                        format!("第 {} 幕中场编号不连续：{} 之后是 {}", act.index, prev, number),
                    );
                    if let Some(heading) = &scene.heading {
                        diag = diag.with_detail(heading.clone());
                    }
                    result.push(diag);
                }
                prev_scene = Some(number);
            }

            if scene.lines.is_empty() {
                let mut diag = Diagnostic::warn(
                    id,
                    format!("第 {} 幕第 {} 场没有任何行", act.index, scene.index),
                );
                if let Some(heading) = &scene.heading {
                    diag = diag.with_detail(heading.clone());
                }
                result.push(diag);
            }
        }
    }

    // 角色 -> (台词行数, 首次出现行号)，按首次出现排序输出
    let mut spoken: HashMap<&str, (usize, usize)> = HashMap::new();
    for line in doc.lines().filter(|l| l.kind == LineKind::Dialogue) {
        if let Some(speaker) = line.speaker() {
            spoken.entry(speaker).or_insert((0, line.line_number)).0 += 1;
        }
    }
    let mut once: Vec<(&str, usize)> = spoken
        .into_iter()
        .filter(|(_, (count, _))| *count == 1)
        .map(|(name, (_, line))| (name, line))
        .collect();
    once.sort_by_key(|(_, line)| *line);
    for (name, line) in once {
        result.push(Diagnostic::info(id, format!("角色 '{}' 只出现了一次", name)).with_line(line));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Parser;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warn("hamlet", "未识别的说话者 'Note'")
            .with_line(12)
            .with_detail("Note: this is a comment");

        let display = diag.to_string();
        assert!(display.starts_with("[WARN] hamlet:12"));
        assert!(display.contains("未识别的说话者"));
        assert!(display.contains("| Note: this is a comment"));
    }

    #[test]
    fn test_diagnostic_result_counts_and_filter() {
        let mut result = DiagnosticResult::new();
        result.push(Diagnostic::error("t", "e"));
        result.push(Diagnostic::warn("t", "w"));
        result.push(Diagnostic::info("t", "i"));

        assert!(result.has_errors());
        assert_eq!(result.warn_count(), 1);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Warn).len(), 2);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Info).len(), 3);

        let mut other = DiagnosticResult::from(vec![Diagnostic::warn("u", "w2")]);
        other.merge(result);
        assert_eq!(other.diagnostics.len(), 4);
    }

    #[test]
    fn test_check_document_clean_script() {
        let text = "\
ACT I
SCENE 1. Hall
A: Hello there.
B: Hi.
A: Bye.
B: Bye.
";
        let doc = Parser::new().parse("clean", text).unwrap();
        let result = check_document(&doc);
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_check_document_reports_structure_problems() {
        let text = "\
ACT I
SCENE 1
SCENE 3
A: Hello.
A: Again.
B: Once.
ACT III
";
        let doc = Parser::new().parse("gaps", text).unwrap();
        let result = check_document(&doc);
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("幕编号不连续")));
        assert!(messages.iter().any(|m| m.contains("场编号不连续")));
        assert!(messages.iter().any(|m| m.contains("第 1 幕第 1 场没有任何行")));
        assert!(messages.iter().any(|m| m.contains("第 2 幕没有任何内容")));
        assert!(messages.iter().any(|m| m.contains("'B' 只出现了一次")));
        assert!(!messages.iter().any(|m| m.contains("'A'")));
        assert!(!result.has_errors());
    }
}
