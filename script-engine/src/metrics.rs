//! # Metrics 模块
//!
//! 对文档做一次按文档顺序（幕 → 场 → 行）的遍历，统计词数、角色台词量和轮次、地点等。
//!
//! ## 轮次
//!
//! 一个轮次是同一角色连续的若干行，被其他角色的行、舞台指示、旁白或新的场打断。
//! 轮次只在“进入”某角色时计数，延续行不计。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::script::{LineKind, ScriptDocument};

/// 角色统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTally {
    /// 角色名
    pub name: String,
    /// 首次出现顺序（从 0 开始，按文档顺序分配）
    pub first_appearance_order: usize,
    /// 台词总词数
    pub total_words: usize,
    /// 轮次数
    pub total_turns: usize,
    /// 台词行数
    #[serde(default)]
    pub line_count: usize,
    /// 出场的场数
    #[serde(default)]
    pub scene_appearances: usize,
}

impl CharacterTally {
    fn new(name: &str, order: usize) -> Self {
        Self {
            name: name.to_string(),
            first_appearance_order: order,
            total_words: 0,
            total_turns: 0,
            line_count: 0,
            scene_appearances: 0,
        }
    }

    /// 平均每轮词数
    pub fn words_per_turn(&self) -> f64 {
        if self.total_turns == 0 {
            0.0
        } else {
            self.total_words as f64 / self.total_turns as f64
        }
    }
}

/// 最长的一段台词（单个轮次）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestSpeech {
    /// 说话者
    pub speaker: String,
    /// 词数
    pub words: usize,
    /// 幕序号
    pub act: usize,
    /// 场序号
    pub scene: usize,
}

/// 单场摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    /// 幕序号
    pub act: usize,
    /// 场序号
    pub scene: usize,
    /// 地点
    pub location: Option<String>,
    /// 词数
    pub word_count: usize,
    /// 本场说话的角色（按本场首次出现排序）
    pub speakers: Vec<String>,
}

/// 文档统计结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetrics {
    /// 总词数（含舞台指示和旁白）
    pub total_word_count: usize,
    /// 角色台词词数
    pub dialogue_word_count: usize,
    /// 幕数
    pub act_count: usize,
    /// 场数
    pub scene_count: usize,
    /// 舞台指示行数
    pub stage_direction_count: usize,
    /// 出现场数最多的地点
    pub main_location: Option<String>,
    /// 角色统计，按首次出现排序
    pub characters: Vec<CharacterTally>,
    /// 最长台词
    pub longest_speech: Option<LongestSpeech>,
    /// 每场摘要
    pub scenes: Vec<SceneSummary>,
}

/// 正在进行的轮次
struct Run {
    character: usize,
    words: usize,
}

/// 统计文档指标
pub fn extract_metrics(doc: &ScriptDocument) -> DocumentMetrics {
    let mut characters: Vec<CharacterTally> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut longest: Option<LongestSpeech> = None;
    let mut scenes = Vec::new();
    let mut total_word_count = 0;
    let mut dialogue_word_count = 0;
    let mut stage_direction_count = 0;

    for (act, scene) in doc.scenes() {
        let mut run: Option<Run> = None;
        let mut seen: HashSet<usize> = HashSet::new();
        let mut speakers = Vec::new();

        // 结束当前轮次，更新最长台词（并列时保留先出现的）
        let mut close_run = |run: &mut Option<Run>, characters: &[CharacterTally]| {
            if let Some(done) = run.take()
                && longest.as_ref().is_none_or(|l| done.words > l.words)
            {
                longest = Some(LongestSpeech {
                    speaker: characters[done.character].name.clone(),
                    words: done.words,
                    act: act.index,
                    scene: scene.index,
                });
            }
        };

        for line in &scene.lines {
            total_word_count += line.word_count;
            if line.kind == LineKind::StageDirection {
                stage_direction_count += 1;
            }

            let Some(name) = line.speaker() else {
                close_run(&mut run, &characters);
                continue;
            };

            let idx = *index.entry(name).or_insert_with(|| {
                characters.push(CharacterTally::new(name, characters.len()));
                characters.len() - 1
            });
            dialogue_word_count += line.word_count;

            let tally = &mut characters[idx];
            tally.total_words += line.word_count;
            tally.line_count += 1;
            if seen.insert(idx) {
                tally.scene_appearances += 1;
                speakers.push(tally.name.clone());
            }

            if let Some(current) = run.as_mut().filter(|r| r.character == idx) {
                current.words += line.word_count;
            } else {
                close_run(&mut run, &characters);
                characters[idx].total_turns += 1;
                run = Some(Run {
                    character: idx,
                    words: line.word_count,
                });
            }
        }
        close_run(&mut run, &characters);

        scenes.push(SceneSummary {
            act: act.index,
            scene: scene.index,
            location: scene.location.clone(),
            word_count: scene.word_count(),
            speakers,
        });
    }

    DocumentMetrics {
        total_word_count,
        dialogue_word_count,
        act_count: doc.acts.len(),
        scene_count: doc.scene_count(),
        stage_direction_count,
        main_location: main_location(doc),
        characters,
        longest_speech: longest,
        scenes,
    }
}

/// 出现场数最多的地点；并列时取文档中先出现的；没有任何场声明地点时为 `None`
pub fn main_location(doc: &ScriptDocument) -> Option<String> {
    // 按首次出现顺序保存 (地点, 场数)
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for (_, scene) in doc.scenes() {
        let Some(location) = scene.location.as_deref() else {
            continue;
        };
        match counts.iter_mut().find(|(l, _)| *l == location) {
            Some((_, count)) => *count += 1,
            None => counts.push((location, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (location, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((location, count));
        }
    }
    best.map(|(location, _)| location.to_string())
}
