//! # 阶段 1：行分类
//!
//! 逐行识别：空行、幕标题、场标题、舞台指示、带角色名前缀的行、普通文本。
//! 此阶段不判断角色名是否有效，只切分出候选名字。

use super::helpers::{parse_heading, split_attribution};
use crate::config::ParserConfig;

/// 场标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeading<'a> {
    /// 标题原文
    pub heading: &'a str,
    /// 编号
    pub number: u32,
    /// 地点
    pub location: Option<&'a str>,
}

/// 行类型（阶段 1 输出）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine<'a> {
    /// 空行
    Blank,
    /// 幕标题，可能同时带一个场标题（`ACT I, SCENE 2. Elsinore`）
    ActHeading {
        heading: &'a str,
        number: u32,
        scene: Option<SceneHeading<'a>>,
    },
    /// 场标题
    SceneHeading(SceneHeading<'a>),
    /// 舞台指示
    StageDirection { text: &'a str },
    /// `候选名字: 台词`
    Attributed { candidate: &'a str, text: &'a str },
    /// 普通文本
    Text { text: &'a str },
}

/// 带行号的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// 行号（从 1 开始）
    pub line_number: usize,
    /// 去掉首尾空白的原文
    pub trimmed: &'a str,
    /// 分类
    pub kind: RawLine<'a>,
}

/// 阶段 1 结果
#[derive(Debug, Clone, Default)]
pub struct Classified<'a> {
    /// 分类后的行
    pub lines: Vec<ClassifiedLine<'a>>,
    /// 未闭合舞台指示的起始行号
    pub unclosed_directions: Vec<usize>,
}

/// 逐行分类
pub fn classify_lines<'a>(text: &'a str, config: &ParserConfig) -> Classified<'a> {
    // 去掉 UTF-8 BOM
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut result = Classified::default();
    // (closer, 起始行号)
    let mut open_direction: Option<(char, usize)> = None;

    for (line_idx, line) in text.lines().enumerate() {
        let line_number = line_idx + 1;
        let trimmed = line.trim();

        // 空行和标题都会结束未闭合的舞台指示
        let kind = if trimmed.is_empty() {
            if let Some((_, start)) = open_direction.take() {
                result.unclosed_directions.push(start);
            }
            RawLine::Blank
        } else if let Some(heading) = classify_heading(trimmed, config) {
            if let Some((_, start)) = open_direction.take() {
                result.unclosed_directions.push(start);
            }
            heading
        } else if let Some((closer, _)) = open_direction {
            if trimmed.contains(closer) {
                open_direction = None;
            }
            RawLine::StageDirection { text: trimmed }
        } else if let Some(&(_, closer)) = config
            .stage_direction_brackets
            .iter()
            .find(|(opener, _)| trimmed.starts_with(*opener))
        {
            let opener_len = trimmed.chars().next().map_or(0, char::len_utf8);
            if !trimmed[opener_len..].contains(closer) {
                open_direction = Some((closer, line_number));
            }
            RawLine::StageDirection { text: trimmed }
        } else if config.indented_stage_directions && line.starts_with(char::is_whitespace) {
            RawLine::StageDirection { text: trimmed }
        } else if let Some((candidate, text)) =
            split_attribution(trimmed, &config.speaker_separators, config.max_speaker_words)
        {
            RawLine::Attributed { candidate, text }
        } else {
            RawLine::Text { text: trimmed }
        };

        result.lines.push(ClassifiedLine {
            line_number,
            trimmed,
            kind,
        });
    }

    if let Some((_, start)) = open_direction {
        result.unclosed_directions.push(start);
    }

    result
}

/// 识别幕/场标题
fn classify_heading<'a>(trimmed: &'a str, config: &ParserConfig) -> Option<RawLine<'a>> {
    if let Some(act) = parse_heading(trimmed, &config.act_keywords) {
        let scene = act
            .remainder
            .and_then(|rest| classify_scene_heading(rest, config));
        return Some(RawLine::ActHeading {
            heading: trimmed,
            number: act.number,
            scene,
        });
    }

    classify_scene_heading(trimmed, config).map(RawLine::SceneHeading)
}

fn classify_scene_heading<'a>(s: &'a str, config: &ParserConfig) -> Option<SceneHeading<'a>> {
    let scene = parse_heading(s, &config.scene_keywords)?;
    Some(SceneHeading {
        heading: s,
        number: scene.number,
        location: scene.remainder,
    })
}
