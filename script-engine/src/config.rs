//! # Config 模块
//!
//! 解析器配置。引擎本身不读文件，宿主负责把 JSON 文本交给 [`ParserConfig::from_json`]。
//!
//! ## 配置优先级（宿主侧）
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::recognizer::{AllCapsRecognizer, CastListRecognizer, SpeakerRecognizer};

/// 说话者识别方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognizerConfig {
    /// 全大写名字视为角色名
    AllCaps,
    /// 只识别给定的角色表
    Cast {
        /// 角色名（规范写法）
        names: Vec<String>,
        /// 别名 -> 角色名
        #[serde(default)]
        aliases: BTreeMap<String, String>,
    },
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self::AllCaps
    }
}

impl RecognizerConfig {
    /// 构建识别器
    pub fn build(&self) -> Box<dyn SpeakerRecognizer> {
        match self {
            Self::AllCaps => Box::new(AllCapsRecognizer),
            Self::Cast { names, aliases } => Box::new(CastListRecognizer::with_aliases(
                names.iter().map(String::as_str),
                aliases.iter().map(|(a, n)| (a.as_str(), n.as_str())),
            )),
        }
    }
}

/// 解析器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// 幕标题关键字（大小写不敏感）
    #[serde(default = "default_act_keywords")]
    pub act_keywords: Vec<String>,

    /// 场标题关键字（大小写不敏感）
    #[serde(default = "default_scene_keywords")]
    pub scene_keywords: Vec<String>,

    /// 角色名与台词之间的分隔符
    #[serde(default = "default_speaker_separators")]
    pub speaker_separators: Vec<char>,

    /// 舞台指示的括号对 (开, 闭)
    #[serde(default = "default_stage_direction_brackets")]
    pub stage_direction_brackets: Vec<(char, char)>,

    /// 缩进行是否视为舞台指示
    #[serde(default = "default_indented_stage_directions")]
    pub indented_stage_directions: bool,

    /// 角色名最多包含的单词数，超过则不当作说话者
    #[serde(default = "default_max_speaker_words")]
    pub max_speaker_words: usize,

    /// 说话者识别方式
    #[serde(default)]
    pub recognizer: RecognizerConfig,
}

// 默认值函数
fn default_act_keywords() -> Vec<String> {
    vec!["ACT".to_string()]
}

fn default_scene_keywords() -> Vec<String> {
    vec!["SCENE".to_string()]
}

fn default_speaker_separators() -> Vec<char> {
    vec![':']
}

fn default_stage_direction_brackets() -> Vec<(char, char)> {
    vec![('[', ']'), ('(', ')')]
}

fn default_indented_stage_directions() -> bool {
    true
}

fn default_max_speaker_words() -> usize {
    4
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            act_keywords: default_act_keywords(),
            scene_keywords: default_scene_keywords(),
            speaker_separators: default_speaker_separators(),
            stage_direction_brackets: default_stage_direction_brackets(),
            indented_stage_directions: default_indented_stage_directions(),
            max_speaker_words: default_max_speaker_words(),
            recognizer: RecognizerConfig::default(),
        }
    }
}

impl ParserConfig {
    /// 从 JSON 文本加载并验证配置
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 使用角色表识别说话者
    pub fn with_cast<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recognizer = RecognizerConfig::Cast {
            names: names.into_iter().map(Into::into).collect(),
            aliases: BTreeMap::new(),
        };
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.act_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("act_keywords 不能为空".to_string()));
        }

        if self.scene_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("scene_keywords 不能为空".to_string()));
        }

        if self.speaker_separators.is_empty() {
            return Err(ConfigError::Invalid("speaker_separators 至少需要一个分隔符".to_string()));
        }

        if let Some(c) = self
            .speaker_separators
            .iter()
            .find(|c| c.is_alphanumeric() || c.is_whitespace())
        {
            return Err(ConfigError::Invalid(format!("分隔符 '{}' 不能是字母、数字或空白", c)));
        }

        if self.max_speaker_words == 0 {
            return Err(ConfigError::Invalid("max_speaker_words 必须大于 0".to_string()));
        }

        if let RecognizerConfig::Cast { names, aliases } = &self.recognizer {
            if names.iter().all(|n| n.trim().is_empty()) {
                return Err(ConfigError::Invalid("角色表不能为空".to_string()));
            }
            if let Some((alias, target)) = aliases.iter().find(|(_, t)| !names.contains(t)) {
                return Err(ConfigError::Invalid(format!(
                    "别名 '{}' 指向不在角色表中的 '{}'",
                    alias, target
                )));
            }
        }

        Ok(())
    }
}
