//! # Analysis 模块
//!
//! 单个剧本的分析入口：解析 → 统计 → 主角判定，结果冻结为 [`ScriptAnalysis`]。
//!
//! 同样的文本和配置总是得到逐字段相同的结果，宿主可以据此缓存。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ParserConfig;
use crate::diagnostic::{DiagnosticResult, check_document};
use crate::error::{AnalysisError, EngineResult};
use crate::metrics::{CharacterTally, LongestSpeech, SceneSummary, extract_metrics};
use crate::protagonist::resolve_protagonist;
use crate::script::{Parser, ScriptDocument};

/// 剧本分析结果
///
/// 构造后不可修改。字段按 camelCase 序列化（`totalWordCount`、`firstAppearanceOrder` 等），
/// 宿主持久化时应原样保存以便往返。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptAnalysis {
    title: String,
    total_word_count: usize,
    act_count: usize,
    scene_count: usize,
    main_location: Option<String>,
    characters: Vec<CharacterTally>,
    protagonist: String,
    #[serde(default)]
    dialogue_word_count: usize,
    #[serde(default)]
    stage_direction_count: usize,
    #[serde(default)]
    total_turns: usize,
    #[serde(default)]
    longest_speech: Option<LongestSpeech>,
    #[serde(default)]
    scenes: Vec<SceneSummary>,
}

impl ScriptAnalysis {
    /// 标题
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 总词数（含舞台指示和旁白）
    pub fn total_word_count(&self) -> usize {
        self.total_word_count
    }

    /// 幕数
    pub fn act_count(&self) -> usize {
        self.act_count
    }

    /// 场数
    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    /// 主要地点
    pub fn main_location(&self) -> Option<&str> {
        self.main_location.as_deref()
    }

    /// 角色统计，按首次出现排序
    pub fn characters(&self) -> &[CharacterTally] {
        &self.characters
    }

    /// 角色数
    pub fn cast_size(&self) -> usize {
        self.characters.len()
    }

    /// 按名字查找角色
    pub fn character(&self, name: &str) -> Option<&CharacterTally> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// 主角名
    pub fn protagonist(&self) -> &str {
        &self.protagonist
    }

    /// 主角的统计；结果不完整（如反序列化得到的残缺数据）时为 `None`
    pub fn protagonist_tally(&self) -> Option<&CharacterTally> {
        self.character(&self.protagonist)
    }

    /// 角色台词词数
    pub fn dialogue_word_count(&self) -> usize {
        self.dialogue_word_count
    }

    /// 舞台指示行数
    pub fn stage_direction_count(&self) -> usize {
        self.stage_direction_count
    }

    /// 全部角色的轮次总数
    pub fn total_turns(&self) -> usize {
        self.total_turns
    }

    /// 最长的一段台词
    pub fn longest_speech(&self) -> Option<&LongestSpeech> {
        self.longest_speech.as_ref()
    }

    /// 每场摘要
    pub fn scenes(&self) -> &[SceneSummary] {
        &self.scenes
    }
}

/// 分析已解析的文档
pub fn analyze_document(doc: &ScriptDocument) -> Result<ScriptAnalysis, AnalysisError> {
    let metrics = extract_metrics(doc);
    let protagonist = resolve_protagonist(&doc.title, &metrics.characters)?
        .name
        .clone();
    let total_turns = metrics.characters.iter().map(|c| c.total_turns).sum();

    debug!(
        title = %doc.title,
        acts = metrics.act_count,
        scenes = metrics.scene_count,
        characters = metrics.characters.len(),
        protagonist = %protagonist,
        "剧本分析完成"
    );

    Ok(ScriptAnalysis {
        title: doc.title.clone(),
        total_word_count: metrics.total_word_count,
        act_count: metrics.act_count,
        scene_count: metrics.scene_count,
        main_location: metrics.main_location,
        characters: metrics.characters,
        protagonist,
        dialogue_word_count: metrics.dialogue_word_count,
        stage_direction_count: metrics.stage_direction_count,
        total_turns,
        longest_speech: metrics.longest_speech,
        scenes: metrics.scenes,
    })
}

/// 使用默认配置分析剧本文本
pub fn analyze(title: &str, text: &str) -> EngineResult<ScriptAnalysis> {
    ScriptAnalyzer::new().analyze(title, text)
}

/// 剧本分析器
///
/// 只持有配置，不持有任何剧本状态；每次调用都使用新的解析器。
#[derive(Debug, Clone, Default)]
pub struct ScriptAnalyzer {
    config: ParserConfig,
}

impl ScriptAnalyzer {
    /// 使用默认配置创建
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定配置创建
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// 分析剧本文本
    pub fn analyze(&self, title: &str, text: &str) -> EngineResult<ScriptAnalysis> {
        self.analyze_with_diagnostics(title, text)
            .map(|(analysis, _)| analysis)
    }

    /// 分析剧本文本，同时返回解析警告和结构检查结果
    pub fn analyze_with_diagnostics(
        &self,
        title: &str,
        text: &str,
    ) -> EngineResult<(ScriptAnalysis, DiagnosticResult)> {
        let mut parser = Parser::with_config(self.config.clone());
        let doc = parser.parse(title, text)?;

        let mut diagnostics = DiagnosticResult::from(parser.warnings().to_vec());
        diagnostics.merge(check_document(&doc));
        if !diagnostics.is_empty() {
            debug!(title, count = diagnostics.diagnostics.len(), "剧本存在诊断信息");
        }

        let analysis = analyze_document(&doc)?;
        Ok((analysis, diagnostics))
    }
}
