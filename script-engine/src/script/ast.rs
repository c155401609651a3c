//! # AST 模块
//!
//! 定义剧本解析后的结构化文档。
//!
//! ## 设计说明
//!
//! 文档是树状的：`ScriptDocument` → `Act` → `Scene` → `Line`，
//! 每一层独占下一层，没有交叉引用。解析器返回后文档即视为只读，
//! 指标统计只借用它。

use serde::{Deserialize, Serialize};

/// 统计一段文本的词数
///
/// 以空白切分，只由标点组成的词（如 `—`、`...`）不计入。
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// 行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineKind {
    /// 角色台词
    Dialogue,
    /// 舞台指示（括号或缩进）
    StageDirection,
    /// 没有说话者的普通文本
    Narration,
}

/// 剧本中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// 说话者（None 表示舞台指示/旁白）
    pub speaker: Option<String>,
    /// 原始文本（不含角色名前缀）
    pub text: String,
    /// 词数
    pub word_count: usize,
    /// 行类型
    pub kind: LineKind,
    /// 源文本行号（从 1 开始）
    pub line_number: usize,
}

impl Line {
    /// 创建台词行
    pub fn dialogue(
        speaker: impl Into<String>,
        text: impl Into<String>,
        line_number: usize,
    ) -> Self {
        Self::build(Some(speaker.into()), text.into(), LineKind::Dialogue, line_number)
    }

    /// 创建舞台指示行
    pub fn stage_direction(text: impl Into<String>, line_number: usize) -> Self {
        Self::build(None, text.into(), LineKind::StageDirection, line_number)
    }

    /// 创建旁白行
    pub fn narration(text: impl Into<String>, line_number: usize) -> Self {
        Self::build(None, text.into(), LineKind::Narration, line_number)
    }

    fn build(speaker: Option<String>, text: String, kind: LineKind, line_number: usize) -> Self {
        Self {
            word_count: count_words(&text),
            speaker,
            text,
            kind,
            line_number,
        }
    }

    /// 说话者名称
    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }
}

/// 场
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 在所属幕中的序号（隐式场为 0，显式场从 1 开始）
    pub index: usize,
    /// 标题中写明的编号
    pub number: Option<u32>,
    /// 标题原文（隐式场为 None）
    pub heading: Option<String>,
    /// 地点
    pub location: Option<String>,
    /// 行列表
    pub lines: Vec<Line>,
}

impl Scene {
    /// 幕内第一个场标题之前的内容所属的隐式场
    pub fn implicit() -> Self {
        Self {
            index: 0,
            number: None,
            heading: None,
            location: None,
            lines: Vec::new(),
        }
    }

    /// 是否是隐式场
    pub fn is_implicit(&self) -> bool {
        self.heading.is_none()
    }

    /// 本场词数
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.word_count).sum()
    }
}

/// 幕
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    /// 在剧本中的序号（从 1 开始）
    pub index: usize,
    /// 标题中写明的编号
    pub number: u32,
    /// 标题原文
    pub heading: String,
    /// 场列表
    pub scenes: Vec<Scene>,
}

/// 解析后的剧本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDocument {
    /// 标题
    pub title: String,
    /// 幕列表
    pub acts: Vec<Act>,
    /// 第一个幕标题之前的原始行（扉页、人物表等），不参与统计
    #[serde(default)]
    pub front_matter: Vec<String>,
}

impl ScriptDocument {
    /// 场总数
    pub fn scene_count(&self) -> usize {
        self.acts.iter().map(|a| a.scenes.len()).sum()
    }

    /// 按文档顺序遍历所有场，附带所属幕
    pub fn scenes(&self) -> impl Iterator<Item = (&Act, &Scene)> {
        self.acts
            .iter()
            .flat_map(|act| act.scenes.iter().map(move |scene| (act, scene)))
    }

    /// 按文档顺序遍历所有行
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.scenes().flat_map(|(_, scene)| scene.lines.iter())
    }
}
