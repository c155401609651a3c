//! # 主角判定
//!
//! 主角是台词总词数最多的角色；并列时取首次出现最早的角色。

use crate::error::AnalysisError;
use crate::metrics::CharacterTally;

/// 从角色统计中选出主角
///
/// 角色列表为空时返回 `AnalysisError::NoCharactersFound`，不会默认选一个。
pub fn resolve_protagonist<'a>(
    title: &str,
    characters: &'a [CharacterTally],
) -> Result<&'a CharacterTally, AnalysisError> {
    characters
        .iter()
        .min_by(|a, b| {
            b.total_words
                .cmp(&a.total_words)
                .then(a.first_appearance_order.cmp(&b.first_appearance_order))
        })
        .ok_or_else(|| AnalysisError::NoCharactersFound {
            title: title.to_string(),
        })
}
