//! # 阶段 2：结构组装
//!
//! 把分类后的行组装为 幕 → 场 → 行 的文档树，并确定每一行的说话者。
//!
//! 规则：
//! - 幕/场标题会清空当前说话者
//! - 没有新说话者的行延续当前说话者；没有当前说话者时是旁白
//! - 候选名字未被识别时，整行作为当前说话者的延续文本（记录警告，不丢行）
//! - 幕内第一个场标题之前的内容归入隐式场（序号 0，无地点）
//! - 第一个幕标题之前的内容进入 `front_matter`，不参与统计

use super::helpers::strip_parenthetical;
use super::phase1::{Classified, ClassifiedLine, RawLine, SceneHeading};
use crate::diagnostic::Diagnostic;
use crate::error::ParseError;
use crate::recognizer::SpeakerRecognizer;
use crate::script::ast::{Act, Line, Scene, ScriptDocument};

/// 文档组装器
pub struct DocumentBuilder<'r> {
    title: String,
    recognizer: &'r dyn SpeakerRecognizer,
    acts: Vec<Act>,
    front_matter: Vec<String>,
    /// 第一行 front matter 的行号
    front_matter_start: Option<usize>,
    current_speaker: Option<String>,
    warnings: Vec<Diagnostic>,
}

impl<'r> DocumentBuilder<'r> {
    /// 创建组装器
    pub fn new(title: &str, recognizer: &'r dyn SpeakerRecognizer) -> Self {
        Self {
            title: title.to_string(),
            recognizer,
            acts: Vec::new(),
            front_matter: Vec::new(),
            front_matter_start: None,
            current_speaker: None,
            warnings: Vec::new(),
        }
    }

    /// 组装文档，返回文档和警告
    pub fn build(
        mut self,
        classified: Classified<'_>,
    ) -> Result<(ScriptDocument, Vec<Diagnostic>), ParseError> {
        for line in &classified.lines {
            self.push_line(line);
        }

        if self.acts.is_empty() {
            return Err(ParseError::MalformedScript { title: self.title });
        }

        if let Some(start) = self.front_matter_start {
            self.warnings.push(
                Diagnostic::warn(
                    &self.title,
                    format!(
                        "第一个幕标题之前有 {} 行内容，未参与统计",
                        self.front_matter.len()
                    ),
                )
                .with_line(start),
            );
        }

        for start in classified.unclosed_directions {
            self.warnings
                .push(Diagnostic::warn(&self.title, "舞台指示的括号没有闭合").with_line(start));
        }
        self.warnings.sort_by_key(|d| d.line);

        let doc = ScriptDocument {
            title: self.title,
            acts: self.acts,
            front_matter: self.front_matter,
        };
        Ok((doc, self.warnings))
    }

    fn push_line(&mut self, line: &ClassifiedLine<'_>) {
        match &line.kind {
            RawLine::Blank => {}
            RawLine::ActHeading {
                heading,
                number,
                scene,
            } => {
                self.acts.push(Act {
                    index: self.acts.len() + 1,
                    number: *number,
                    heading: heading.to_string(),
                    scenes: Vec::new(),
                });
                self.current_speaker = None;
                if let Some(scene) = scene {
                    self.open_scene(scene);
                }
            }
            RawLine::SceneHeading(scene) => {
                if self.acts.is_empty() {
                    self.push_front_matter(line);
                } else {
                    self.open_scene(scene);
                }
            }
            RawLine::StageDirection { text } => {
                if self.acts.is_empty() {
                    self.push_front_matter(line);
                } else {
                    self.push_content(Line::stage_direction(*text, line.line_number));
                }
            }
            RawLine::Attributed { candidate, text } => {
                if self.acts.is_empty() {
                    self.push_front_matter(line);
                } else {
                    self.push_attributed(line, candidate, text);
                }
            }
            RawLine::Text { text } => {
                if self.acts.is_empty() {
                    self.push_front_matter(line);
                } else {
                    let content = self.continuation(text, line.line_number);
                    self.push_content(content);
                }
            }
        }
    }

    fn push_attributed(&mut self, line: &ClassifiedLine<'_>, candidate: &str, text: &str) {
        let name = strip_parenthetical(candidate);
        match self.recognizer.recognize(&name) {
            Some(speaker) => {
                self.current_speaker = Some(speaker.clone());
                // `NAME:` 单独一行只切换说话者，台词在后续行
                if !text.is_empty() {
                    self.push_content(Line::dialogue(speaker, text, line.line_number));
                }
            }
            None => {
                self.warnings.push(
                    Diagnostic::warn(
                        &self.title,
                        format!("未识别的说话者 '{}'，按延续文本处理", candidate),
                    )
                    .with_line(line.line_number)
                    .with_detail(line.trimmed),
                );
                let content = self.continuation(line.trimmed, line.line_number);
                self.push_content(content);
            }
        }
    }

    /// 延续当前说话者；没有说话者时作为旁白
    fn continuation(&self, text: &str, line_number: usize) -> Line {
        match &self.current_speaker {
            Some(speaker) => Line::dialogue(speaker.clone(), text, line_number),
            None => Line::narration(text, line_number),
        }
    }

    fn open_scene(&mut self, heading: &SceneHeading<'_>) {
        self.current_speaker = None;
        let Some(act) = self.acts.last_mut() else {
            return;
        };
        let explicit = act.scenes.iter().filter(|s| !s.is_implicit()).count();
        act.scenes.push(Scene {
            index: explicit + 1,
            number: Some(heading.number),
            heading: Some(heading.heading.to_string()),
            location: heading.location.map(str::to_string),
            lines: Vec::new(),
        });
    }

    fn push_content(&mut self, line: Line) {
        let Some(act) = self.acts.last_mut() else {
            return;
        };
        if act.scenes.is_empty() {
            act.scenes.push(Scene::implicit());
        }
        if let Some(scene) = act.scenes.last_mut() {
            scene.lines.push(line);
        }
    }

    fn push_front_matter(&mut self, line: &ClassifiedLine<'_>) {
        self.front_matter_start.get_or_insert(line.line_number);
        self.front_matter.push(line.trimmed.to_string());
    }
}
