//! # 分析链路集成测试
//!
//! 测试 文本 → Parser → ScriptAnalysis → ComparisonReport 的完整链路。

use script_engine::{
    Comparator, DiagnosticLevel, Metric, ScriptAnalysis, ScriptAnalyzer, analyze, compare,
};

const HAMLET: &str = "\
THE TRAGEDY OF HAMLET, PRINCE OF DENMARK

ACT I
SCENE I. Elsinore. A platform before the castle.
[FRANCISCO at his post. Enter to him BERNARDO]
BERNARDO: Who's there?
FRANCISCO: Nay, answer me: stand, and unfold yourself.
BERNARDO: Long live the king!
FRANCISCO: Bernardo?
BERNARDO: He.
SCENE II. A room of state in the castle.
KING CLAUDIUS: Though yet of Hamlet our dear brother's death
The memory be green,
HAMLET (aside): A little more than kin, and less than kind.
ACT II
SCENE I. A room in Polonius' house.
POLONIUS: Give him this money and these notes, Reynaldo.
REYNALDO: I will, my lord.
SCENE II. Elsinore. A platform before the castle.
HAMLET: Words, words, words.
    Exit POLONIUS.
";

const MACBETH: &str = "\
ACT I
SCENE I. A desert place.
[Thunder and lightning. Enter three Witches]
FIRST WITCH: When shall we three meet again
In thunder, lightning, or in rain?
SECOND WITCH: When the hurlyburly's done,
When the battle's lost and won.
THIRD WITCH: That will be ere the set of sun.
";

/// 测试单部剧本的完整统计
#[test]
fn test_hamlet_analysis() {
    let a = analyze("Hamlet", HAMLET).unwrap();

    // 1. 结构
    assert_eq!(a.act_count(), 2);
    assert_eq!(a.scene_count(), 4);
    assert_eq!(
        a.main_location(),
        Some("Elsinore. A platform before the castle")
    );

    // 2. 词数（标题行不计入）
    assert_eq!(a.total_word_count(), 61);
    assert_eq!(a.dialogue_word_count(), 51);
    assert_eq!(a.stage_direction_count(), 2);

    // 3. 角色按首次出现排序
    let names: Vec<_> = a.characters().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "BERNARDO",
            "FRANCISCO",
            "KING CLAUDIUS",
            "HAMLET",
            "POLONIUS",
            "REYNALDO"
        ]
    );
    for (i, c) in a.characters().iter().enumerate() {
        assert_eq!(c.first_appearance_order, i);
    }

    let bernardo = a.character("BERNARDO").unwrap();
    assert_eq!((bernardo.total_words, bernardo.total_turns), (7, 3));

    // 延续行并入同一轮次
    let king = a.character("KING CLAUDIUS").unwrap();
    assert_eq!((king.total_words, king.total_turns, king.line_count), (12, 1, 2));

    let hamlet = a.character("HAMLET").unwrap();
    assert_eq!((hamlet.total_words, hamlet.total_turns), (12, 2));
    assert_eq!(hamlet.scene_appearances, 2);

    // 4. 主角并列时取先出场者
    assert_eq!(a.protagonist(), "KING CLAUDIUS");
    assert_eq!(a.total_turns(), 10);

    let longest = a.longest_speech().unwrap();
    assert_eq!(longest.speaker, "KING CLAUDIUS");
    assert_eq!((longest.words, longest.act, longest.scene), (12, 1, 2));

    // 5. 每场摘要
    let first = &a.scenes()[0];
    assert_eq!(first.word_count, 23);
    assert_eq!(first.speakers, vec!["BERNARDO", "FRANCISCO"]);
}

/// 测试诊断信息随分析一起返回
#[test]
fn test_hamlet_diagnostics() {
    let (_, diags) = ScriptAnalyzer::new()
        .analyze_with_diagnostics("Hamlet", HAMLET)
        .unwrap();

    assert!(!diags.has_errors());
    assert_eq!(diags.warn_count(), 1);
    assert_eq!(diags.diagnostics[0].line, Some(1));

    let infos: Vec<_> = diags
        .diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Info)
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        infos,
        vec!["角色 'POLONIUS' 只出现了一次", "角色 'REYNALDO' 只出现了一次"]
    );
}

/// 测试两部剧本的对比
#[test]
fn test_compare_hamlet_and_macbeth() {
    let a = analyze("Hamlet", HAMLET).unwrap();
    let b = analyze("Macbeth", MACBETH).unwrap();
    assert_eq!(b.protagonist(), "FIRST WITCH");

    let report = compare(&a, &b).unwrap();
    assert_eq!(report.title_a(), "Hamlet");
    assert_eq!(report.title_b(), "Macbeth");

    let expected = [
        (Metric::TotalWordCount, 61, 36, Comparator::AGreater),
        (Metric::ActCount, 2, 1, Comparator::AGreater),
        (Metric::SceneCount, 4, 1, Comparator::AGreater),
        (Metric::CastSize, 6, 3, Comparator::AGreater),
        (Metric::ProtagonistWords, 12, 12, Comparator::Equal),
        (Metric::StageDirectionCount, 2, 1, Comparator::AGreater),
        (Metric::LongestSpeechWords, 12, 12, Comparator::Equal),
        (Metric::TotalTurns, 10, 3, Comparator::AGreater),
    ];
    for (metric, value_a, value_b, comparator) in expected {
        let row = report.get(metric).unwrap();
        assert_eq!(
            (row.value_a, row.value_b, row.comparator),
            (value_a, value_b, comparator),
            "{metric}"
        );
    }

    assert!(report.shared_characters().is_empty());
    assert!(!report.same_protagonist());
    assert!(!report.same_main_location());

    // 交换 A/B 后比较方向随之翻转
    let swapped = compare(&b, &a).unwrap();
    for (forward, backward) in report.per_field().iter().zip(swapped.per_field()) {
        assert_eq!(forward.comparator.flipped(), backward.comparator);
    }
}

/// 测试持久化后的分析结果仍可对比
#[test]
fn test_persisted_analysis_round_trip() {
    let a = analyze("Hamlet", HAMLET).unwrap();
    let json = serde_json::to_string(&a).unwrap();
    let restored: ScriptAnalysis = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, a);

    let report = compare(&restored, &a).unwrap();
    assert!(report.same_protagonist());
    assert!(report.same_main_location());
    assert_eq!(report.shared_characters().len(), 6);
    assert!(
        report
            .per_field()
            .iter()
            .all(|row| row.comparator == Comparator::Equal)
    );
}

/// 测试不同剧本可以在不同线程上并发分析
#[test]
fn test_concurrent_analysis() {
    let analyzer = ScriptAnalyzer::new();
    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| analyzer.analyze("Hamlet", HAMLET));
        let b = s.spawn(|| analyzer.analyze("Macbeth", MACBETH));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a.unwrap(), analyze("Hamlet", HAMLET).unwrap());
    assert_eq!(b.unwrap(), analyze("Macbeth", MACBETH).unwrap());
}
