//! # 说话者识别
//!
//! 决定 `NAME: 台词` 中的 `NAME` 是否是一个角色名。
//!
//! 普通的大写文字和角色名之间没有可靠的界线，因此识别规则做成可替换的：
//! 默认按全大写判断，也可以提供角色表精确匹配，或通过
//! [`Parser::with_recognizer`](crate::script::Parser::with_recognizer) 注入自定义实现。

use std::collections::HashMap;

/// 说话者识别器
pub trait SpeakerRecognizer: Send + Sync {
    /// 识别候选名字，返回规范化后的角色名；不是角色名则返回 `None`
    fn recognize(&self, token: &str) -> Option<String>;
}

/// 合并连续空白并去掉首尾空白
pub fn normalize_name(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 全大写识别器
///
/// 要求至少一个大写字母、没有小写字母，且只包含字母、数字、空格和 `.'-&`。
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCapsRecognizer;

impl SpeakerRecognizer for AllCapsRecognizer {
    fn recognize(&self, token: &str) -> Option<String> {
        let name = normalize_name(token);
        if name.is_empty() {
            return None;
        }

        let mut has_upper = false;
        for c in name.chars() {
            if c.is_lowercase() {
                return None;
            }
            if c.is_uppercase() {
                has_upper = true;
            } else if !(c.is_alphanumeric() || matches!(c, ' ' | '.' | '\'' | '-' | '&')) {
                return None;
            }
        }

        has_upper.then_some(name)
    }
}

/// 角色表识别器
///
/// 大小写不敏感、空白归一化后匹配，返回角色表中的写法。
#[derive(Debug, Clone, Default)]
pub struct CastListRecognizer {
    /// 归一化键 -> 规范角色名
    lookup: HashMap<String, String>,
}

impl CastListRecognizer {
    /// 从角色表创建
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_aliases(names, std::iter::empty())
    }

    /// 从角色表和别名表创建
    pub fn with_aliases<'a>(
        names: impl IntoIterator<Item = &'a str>,
        aliases: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut lookup = HashMap::new();
        for name in names {
            let canonical = normalize_name(name);
            if canonical.is_empty() {
                continue;
            }
            lookup.insert(Self::key(&canonical), canonical);
        }
        for (alias, name) in aliases {
            lookup.insert(Self::key(alias), normalize_name(name));
        }
        Self { lookup }
    }

    fn key(token: &str) -> String {
        normalize_name(token).to_uppercase()
    }
}

impl SpeakerRecognizer for CastListRecognizer {
    fn recognize(&self, token: &str) -> Option<String> {
        self.lookup.get(&Self::key(token)).cloned()
    }
}
