//! # Compare 模块
//!
//! 对比两个分析结果，逐项给出 (A 值, B 值, 大小关系)。
//!
//! 对比只读取两个 [`ScriptAnalysis`]，不修改它们；同样的两个输入总是得到同样的报告。
//! 交换 A/B 后每一项的大小关系随之翻转，`EQUAL` 保持不变。

use serde::{Deserialize, Serialize};

use crate::analysis::ScriptAnalysis;
use crate::error::{CompareError, Side};

/// 对比指标
///
/// 声明顺序即报告顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// 总词数
    TotalWordCount,
    /// 幕数
    ActCount,
    /// 场数
    SceneCount,
    /// 角色数
    CastSize,
    /// 主角台词词数
    ProtagonistWords,
    /// 舞台指示行数
    StageDirectionCount,
    /// 最长台词词数
    LongestSpeechWords,
    /// 轮次总数
    TotalTurns,
}

impl Metric {
    /// 全部指标，按报告顺序
    pub const ALL: [Metric; 8] = [
        Metric::TotalWordCount,
        Metric::ActCount,
        Metric::SceneCount,
        Metric::CastSize,
        Metric::ProtagonistWords,
        Metric::StageDirectionCount,
        Metric::LongestSpeechWords,
        Metric::TotalTurns,
    ];

    /// 指标名（与序列化名一致）
    pub fn name(self) -> &'static str {
        match self {
            Self::TotalWordCount => "totalWordCount",
            Self::ActCount => "actCount",
            Self::SceneCount => "sceneCount",
            Self::CastSize => "castSize",
            Self::ProtagonistWords => "protagonistWords",
            Self::StageDirectionCount => "stageDirectionCount",
            Self::LongestSpeechWords => "longestSpeechWords",
            Self::TotalTurns => "totalTurns",
        }
    }

    /// 从已验证的分析结果中取值
    fn value(self, analysis: &ScriptAnalysis) -> usize {
        match self {
            Self::TotalWordCount => analysis.total_word_count(),
            Self::ActCount => analysis.act_count(),
            Self::SceneCount => analysis.scene_count(),
            Self::CastSize => analysis.cast_size(),
            Self::ProtagonistWords => analysis.protagonist_tally().map_or(0, |t| t.total_words),
            Self::StageDirectionCount => analysis.stage_direction_count(),
            Self::LongestSpeechWords => analysis.longest_speech().map_or(0, |s| s.words),
            Self::TotalTurns => analysis.total_turns(),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 大小关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparator {
    /// A 更大
    AGreater,
    /// B 更大
    BGreater,
    /// 相等
    Equal,
}

impl Comparator {
    /// 比较两个值
    pub fn between(a: usize, b: usize) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Self::AGreater,
            std::cmp::Ordering::Less => Self::BGreater,
            std::cmp::Ordering::Equal => Self::Equal,
        }
    }

    /// 交换 A/B 后的关系
    pub fn flipped(self) -> Self {
        match self {
            Self::AGreater => Self::BGreater,
            Self::BGreater => Self::AGreater,
            Self::Equal => Self::Equal,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AGreater => write!(f, "A_GREATER"),
            Self::BGreater => write!(f, "B_GREATER"),
            Self::Equal => write!(f, "EQUAL"),
        }
    }
}

/// 单项对比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    /// 指标
    pub metric: Metric,
    /// A 值
    pub value_a: usize,
    /// B 值
    pub value_b: usize,
    /// 大小关系
    pub comparator: Comparator,
}

/// 对比报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    title_a: String,
    title_b: String,
    #[serde(with = "per_field_map")]
    per_field: Vec<MetricComparison>,
    shared_characters: Vec<String>,
    same_protagonist: bool,
    same_main_location: bool,
}

impl ComparisonReport {
    /// A 的标题
    pub fn title_a(&self) -> &str {
        &self.title_a
    }

    /// B 的标题
    pub fn title_b(&self) -> &str {
        &self.title_b
    }

    /// 全部对比项，按 [`Metric::ALL`] 顺序
    pub fn per_field(&self) -> &[MetricComparison] {
        &self.per_field
    }

    /// 查找单项对比
    pub fn get(&self, metric: Metric) -> Option<&MetricComparison> {
        self.per_field.iter().find(|c| c.metric == metric)
    }

    /// 两部剧都有的角色（按 A 中首次出现排序）
    pub fn shared_characters(&self) -> &[String] {
        &self.shared_characters
    }

    /// 主角是否同名
    pub fn same_protagonist(&self) -> bool {
        self.same_protagonist
    }

    /// 主要地点是否相同（两边都有地点时才可能为 true）
    pub fn same_main_location(&self) -> bool {
        self.same_main_location
    }
}

impl std::fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "A: {}", self.title_a)?;
        writeln!(f, "B: {}", self.title_b)?;
        for c in &self.per_field {
            writeln!(
                f,
                "{:<20}{:>8}{:>8}  {}",
                c.metric.name(),
                c.value_a,
                c.value_b,
                c.comparator
            )?;
        }
        writeln!(f, "sharedCharacters: {}", self.shared_characters.join(", "))?;
        writeln!(f, "sameProtagonist: {}", self.same_protagonist)?;
        write!(f, "sameMainLocation: {}", self.same_main_location)
    }
}

/// `perField` 按 `指标名 -> { valueA, valueB, comparator }` 序列化
mod per_field_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Comparator, Metric, MetricComparison};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Entry {
        value_a: usize,
        value_b: usize,
        comparator: Comparator,
    }

    pub fn serialize<S: Serializer>(
        rows: &[MetricComparison],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(rows.iter().map(|row| {
            let entry = Entry {
                value_a: row.value_a,
                value_b: row.value_b,
                comparator: row.comparator,
            };
            (row.metric, entry)
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<MetricComparison>, D::Error> {
        let map = BTreeMap::<Metric, Entry>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(metric, entry)| MetricComparison {
                metric,
                value_a: entry.value_a,
                value_b: entry.value_b,
                comparator: entry.comparator,
            })
            .collect())
    }
}

/// 检查分析结果是否完整到可以对比
fn validate(side: Side, analysis: &ScriptAnalysis) -> Result<(), CompareError> {
    let fail = |reason: &str| CompareError::IncomparableAnalyses {
        side,
        title: analysis.title().to_string(),
        reason: reason.to_string(),
    };

    if analysis.act_count() == 0 {
        return Err(fail("没有任何幕"));
    }
    if analysis.characters().is_empty() {
        return Err(fail("没有角色统计"));
    }
    if analysis.protagonist().is_empty() {
        return Err(fail("缺少主角"));
    }
    if analysis.protagonist_tally().is_none() {
        return Err(fail("主角不在角色列表中"));
    }
    Ok(())
}

/// 对比两个分析结果
pub fn compare(a: &ScriptAnalysis, b: &ScriptAnalysis) -> Result<ComparisonReport, CompareError> {
    validate(Side::A, a)?;
    validate(Side::B, b)?;

    let per_field = Metric::ALL
        .iter()
        .map(|&metric| {
            let value_a = metric.value(a);
            let value_b = metric.value(b);
            MetricComparison {
                metric,
                value_a,
                value_b,
                comparator: Comparator::between(value_a, value_b),
            }
        })
        .collect();

    let shared_characters = a
        .characters()
        .iter()
        .filter(|c| b.character(&c.name).is_some())
        .map(|c| c.name.clone())
        .collect();

    Ok(ComparisonReport {
        title_a: a.title().to_string(),
        title_b: b.title().to_string(),
        per_field,
        shared_characters,
        same_protagonist: a.protagonist() == b.protagonist(),
        same_main_location: a.main_location().is_some() && a.main_location() == b.main_location(),
    })
}

/// 对比两个可能缺失的分析结果（如宿主只加载了一侧）
pub fn compare_optional(
    a: Option<&ScriptAnalysis>,
    b: Option<&ScriptAnalysis>,
) -> Result<ComparisonReport, CompareError> {
    let a = a.ok_or(CompareError::MissingAnalysis { side: Side::A })?;
    let b = b.ok_or(CompareError::MissingAnalysis { side: Side::B })?;
    compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    const LONG: &str = "\
ACT I
SCENE 1. Elsinore
HAMLET: To be, or not to be, that is the question.
HORATIO: My lord.
[Exit Horatio]
ACT II
SCENE 1. Elsinore
HAMLET: Words, words, words.
";

    const SHORT: &str = "\
ACT I
SCENE 1. A heath
WITCH: When shall we three meet again?
HORATIO: Soon.
";

    fn pair() -> (ScriptAnalysis, ScriptAnalysis) {
        (analyze("long", LONG).unwrap(), analyze("short", SHORT).unwrap())
    }

    #[test]
    fn test_comparator_between_and_flipped() {
        assert_eq!(Comparator::between(3, 1), Comparator::AGreater);
        assert_eq!(Comparator::between(1, 3), Comparator::BGreater);
        assert_eq!(Comparator::between(2, 2), Comparator::Equal);
        assert_eq!(Comparator::AGreater.flipped(), Comparator::BGreater);
        assert_eq!(Comparator::Equal.flipped(), Comparator::Equal);
    }

    #[test]
    fn test_compare_fields() {
        let (a, b) = pair();
        let report = compare(&a, &b).unwrap();

        let acts = report.get(Metric::ActCount).unwrap();
        assert_eq!((acts.value_a, acts.value_b), (2, 1));
        assert_eq!(acts.comparator, Comparator::AGreater);

        let cast = report.get(Metric::CastSize).unwrap();
        assert_eq!(cast.comparator, Comparator::Equal);

        let protagonist = report.get(Metric::ProtagonistWords).unwrap();
        assert_eq!((protagonist.value_a, protagonist.value_b), (13, 6));

        assert_eq!(report.shared_characters(), ["HORATIO"]);
        assert!(!report.same_protagonist());
        assert!(!report.same_main_location());
        assert_eq!(report.per_field().len(), Metric::ALL.len());
    }

    #[test]
    fn test_compare_is_symmetric() {
        let (a, b) = pair();
        let ab = compare(&a, &b).unwrap();
        let ba = compare(&b, &a).unwrap();

        for metric in Metric::ALL {
            let x = ab.get(metric).unwrap();
            let y = ba.get(metric).unwrap();
            assert_eq!(x.value_a, y.value_b);
            assert_eq!(x.value_b, y.value_a);
            assert_eq!(x.comparator, y.comparator.flipped(), "{metric}");
        }
    }

    #[test]
    fn test_compare_identical_scripts() {
        let a = analyze("same", LONG).unwrap();
        let report = compare(&a, &a.clone()).unwrap();
        assert!(
            report
                .per_field()
                .iter()
                .all(|c| c.comparator == Comparator::Equal)
        );
        assert!(report.same_protagonist());
        assert!(report.same_main_location());
        assert_eq!(report, compare(&a, &a).unwrap());
    }

    #[test]
    fn test_compare_missing_side() {
        let (a, _) = pair();
        assert_eq!(
            compare_optional(Some(&a), None).unwrap_err(),
            CompareError::MissingAnalysis { side: Side::B }
        );
        assert_eq!(
            compare_optional(None, Some(&a)).unwrap_err(),
            CompareError::MissingAnalysis { side: Side::A }
        );
        assert!(compare_optional(Some(&a), Some(&a)).is_ok());
    }

    #[test]
    fn test_compare_rejects_incomplete_analysis() {
        let (a, _) = pair();
        let mut json = serde_json::to_value(&a).unwrap();
        json["protagonist"] = serde_json::Value::String("NOBODY".to_string());
        let broken: ScriptAnalysis = serde_json::from_value(json).unwrap();

        let err = compare(&a, &broken).unwrap_err();
        assert!(matches!(
            err,
            CompareError::IncomparableAnalyses { side: Side::B, .. }
        ));
    }

    #[test]
    fn test_report_serialization_names() {
        let (a, b) = pair();
        let json = serde_json::to_value(compare(&a, &b).unwrap()).unwrap();
        assert_eq!(json["perField"]["totalWordCount"]["valueA"], 17);
        assert_eq!(json["perField"]["totalWordCount"]["valueB"], 7);
        assert_eq!(json["perField"]["castSize"]["comparator"], "EQUAL");
        assert_eq!(json["sharedCharacters"][0], "HORATIO");
    }

    #[test]
    fn test_report_json_round_trip_keeps_metric_order() {
        let (a, b) = pair();
        let report = compare(&a, &b).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: ComparisonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);

        let metrics: Vec<_> = back.per_field().iter().map(|row| row.metric).collect();
        assert_eq!(metrics, Metric::ALL);
    }

    #[test]
    fn test_report_display() {
        let (a, b) = pair();
        let report = compare(&a, &b).unwrap();
        insta::assert_snapshot!(report.to_string(), @r"
        A: long
        B: short
        totalWordCount            17       7  A_GREATER
        actCount                   2       1  A_GREATER
        sceneCount                 2       1  A_GREATER
        castSize                   2       2  EQUAL
        protagonistWords          13       6  A_GREATER
        stageDirectionCount        1       0  A_GREATER
        longestSpeechWords        10       6  A_GREATER
        totalTurns                 3       2  A_GREATER
        sharedCharacters: HORATIO
        sameProtagonist: false
        sameMainLocation: false
        ");
    }
}
