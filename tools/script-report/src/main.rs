//! # Script Report
//!
//! 剧本分析报告工具 - 读取剧本文件，输出分析结果、对比报告或结构检查结果。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p script-report -- analyze hamlet.txt
//! cargo run -p script-report -- analyze hamlet.txt macbeth.txt --json
//! cargo run -p script-report -- compare hamlet.txt macbeth.txt
//! cargo run -p script-report -- compare hamlet.json macbeth.txt --json
//! cargo run -p script-report -- check plays/
//!
//! # 指定角色表或配置文件
//! script-report --cast Nora,Helmer analyze dolls_house.txt
//! script-report --config parser.json -vv check
//! ```
//!
//! 剧本标题取文件名（不含扩展名）。`compare` 的输入既可以是剧本文本，
//! 也可以是 `analyze --json` 保存的单个分析结果（`.json`）。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use script_engine::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, ParserConfig, ScriptAnalysis, ScriptAnalyzer,
    compare,
};
use tracing::{Level, debug, info, warn};
use walkdir::WalkDir;

/// `check` 收集的剧本扩展名
const SCRIPT_EXTENSIONS: &[&str] = &["txt", "play"];

#[derive(Parser)]
#[command(name = "script-report")]
#[command(about = "剧本分析报告工具 - 统计幕、场、角色台词并对比两部剧本")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 解析器配置文件（JSON）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 角色表（逗号分隔或多次指定）；指定后按角色表识别说话者
    #[arg(long, value_delimiter = ',', global = true)]
    cast: Vec<String>,

    /// 日志详细程度（-v: info，-vv: debug）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 分析一个或多个剧本
    Analyze {
        /// 剧本文件
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 对比两个剧本
    Compare {
        /// A 侧剧本（文本或分析结果 JSON）
        a: PathBuf,

        /// B 侧剧本（文本或分析结果 JSON）
        b: PathBuf,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 检查剧本结构（目录下所有 .txt / .play 文件）
    Check {
        /// 文件或目录（默认：当前目录）
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.cast)?;
    let analyzer = ScriptAnalyzer::with_config(config);

    match cli.command {
        Commands::Analyze { files, json } => analyze_files(&analyzer, &files, json),
        Commands::Compare { a, b, json } => compare_files(&analyzer, &a, &b, json),
        Commands::Check { path } => {
            check_path(&analyzer, path.as_deref().unwrap_or(Path::new(".")))
        }
    }
}

/// 加载解析器配置；`--cast` 覆盖配置文件中的识别器
fn load_config(path: Option<&Path>, cast: &[String]) -> anyhow::Result<ParserConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
            ParserConfig::from_json(&json)?
        }
        None => ParserConfig::default(),
    };

    if !cast.is_empty() {
        config = config.with_cast(cast.iter().cloned());
        config.validate()?;
    }

    debug!(?config, "解析器配置");
    Ok(config)
}

/// 剧本标题：文件名（不含扩展名）
fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 读取并分析单个剧本文件
fn analyze_file(
    analyzer: &ScriptAnalyzer,
    path: &Path,
) -> anyhow::Result<(ScriptAnalysis, DiagnosticResult)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取剧本 {}", path.display()))?;
    let title = title_of(path);

    info!(title = %title, path = %path.display(), "分析剧本");
    analyzer
        .analyze_with_diagnostics(&title, &text)
        .with_context(|| format!("分析 {} 失败", path.display()))
}

/// 加载对比输入：`.json` 视为已保存的分析结果，其余按剧本文本分析
fn load_analysis(analyzer: &ScriptAnalyzer, path: &Path) -> anyhow::Result<ScriptAnalysis> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取分析结果 {}", path.display()))?;
        return serde_json::from_str(&json)
            .with_context(|| format!("{} 不是有效的分析结果", path.display()));
    }

    let (analysis, diagnostics) = analyze_file(analyzer, path)?;
    log_diagnostics(&diagnostics);
    Ok(analysis)
}

fn log_diagnostics(diagnostics: &DiagnosticResult) {
    for diag in diagnostics.filter_by_level(DiagnosticLevel::Warn) {
        warn!("{}", diag);
    }
}

//=============================================================================
// analyze / compare
//=============================================================================

fn analyze_files(analyzer: &ScriptAnalyzer, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let mut analyses = Vec::with_capacity(files.len());
    for file in files {
        let (analysis, diagnostics) = analyze_file(analyzer, file)?;
        log_diagnostics(&diagnostics);
        analyses.push(analysis);
    }

    if json {
        // 单个文件输出对象，便于直接作为 compare 的输入
        let out = match analyses.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        println!("{out}");
    } else {
        let rendered: Vec<_> = analyses.iter().map(render_analysis).collect();
        println!("{}", rendered.join("\n"));
    }
    Ok(())
}

fn compare_files(analyzer: &ScriptAnalyzer, a: &Path, b: &Path, json: bool) -> anyhow::Result<()> {
    let analysis_a = load_analysis(analyzer, a)?;
    let analysis_b = load_analysis(analyzer, b)?;
    let report = compare(&analysis_a, &analysis_b)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

/// 渲染单个分析结果
fn render_analysis(analysis: &ScriptAnalysis) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("《{}》", analysis.title()));
    line(format!(
        "  幕数: {}  场数: {}  角色数: {}",
        analysis.act_count(),
        analysis.scene_count(),
        analysis.cast_size()
    ));
    line(format!(
        "  总词数: {}（台词 {}，舞台指示 {} 行）",
        analysis.total_word_count(),
        analysis.dialogue_word_count(),
        analysis.stage_direction_count()
    ));
    line(format!(
        "  主要地点: {}",
        analysis.main_location().unwrap_or("（无）")
    ));
    line(format!("  主角: {}", analysis.protagonist()));
    if let Some(speech) = analysis.longest_speech() {
        line(format!(
            "  最长台词: {}，{} 词（第 {} 幕第 {} 场）",
            speech.speaker, speech.words, speech.act, speech.scene
        ));
    }

    line(String::new());
    line(format!(
        "  {:<20}{:>6}{:>8}{:>6}{:>8}{:>6}",
        "角色", "出场", "词数", "轮次", "词/轮", "场数"
    ));
    for c in analysis.characters() {
        line(format!(
            "  {:<20}{:>6}{:>8}{:>6}{:>8.1}{:>6}",
            c.name,
            c.first_appearance_order,
            c.total_words,
            c.total_turns,
            c.words_per_turn(),
            c.scene_appearances
        ));
    }
    out
}

//=============================================================================
// check
//=============================================================================

/// 检查文件或目录下的所有剧本
fn check_path(analyzer: &ScriptAnalyzer, path: &Path) -> anyhow::Result<()> {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        collect_script_files(path)
    } else {
        bail!("路径不存在: {}", path.display());
    };

    if files.is_empty() {
        eprintln!("未找到剧本文件（.txt / .play）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个剧本文件...\n", files.len());

    let mut result = DiagnosticResult::new();
    for file in &files {
        result.merge(check_file(analyzer, file));
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个剧本", files.len());
    eprintln!();
    for diag in &result.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = result.error_count();
    let warn_count = result.warn_count();
    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }

    if result.has_errors() {
        bail!("剧本检查发现错误");
    }
    Ok(())
}

/// 检查单个剧本；读取或分析失败记为错误，不中断其余文件
fn check_file(analyzer: &ScriptAnalyzer, file: &Path) -> DiagnosticResult {
    let id = title_of(file);
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            return vec![Diagnostic::error(&id, format!("无法读取文件 - {e}"))].into();
        }
    };

    match analyzer.analyze_with_diagnostics(&id, &text) {
        Ok((_, diagnostics)) => diagnostics,
        Err(e) => vec![Diagnostic::error(&id, e.to_string())].into(),
    }
}

/// 收集目录下的所有剧本文件（按路径排序）
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAY: &str = "\
ACT I
SCENE 1. A road
X: one two three four five six seven eight nine ten
Y: one two three four five
ACT II
SCENE 1. A road
X: one two three
";

    #[test]
    fn test_collect_script_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("act")).unwrap();
        std::fs::write(dir.path().join("b.play"), PLAY).unwrap();
        std::fs::write(dir.path().join("a.txt"), PLAY).unwrap();
        std::fs::write(dir.path().join("act/c.txt"), PLAY).unwrap();
        std::fs::write(dir.path().join("notes.md"), "# notes").unwrap();

        let files = collect_script_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("act").join("c.txt"),
                PathBuf::from("b.play"),
            ]
        );
    }

    #[test]
    fn test_title_is_file_stem() {
        assert_eq!(title_of(Path::new("plays/hamlet.txt")), "hamlet");
        assert_eq!(title_of(Path::new("macbeth")), "macbeth");
    }

    #[test]
    fn test_load_config_with_cast() {
        let config = load_config(None, &["Nora".to_string(), "Helmer".to_string()]).unwrap();
        let analysis = ScriptAnalyzer::with_config(config)
            .analyze("doll", "Act 1\nNora: Hello.\nHelmer: Hi there.\n")
            .unwrap();
        assert_eq!(analysis.protagonist(), "Helmer");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parser.json");
        std::fs::write(&path, r#"{ "act_keywords": ["AKT"] }"#).unwrap();

        let config = load_config(Some(&path), &[]).unwrap();
        assert_eq!(config.act_keywords, vec!["AKT".to_string()]);

        assert!(load_config(Some(&dir.path().join("missing.json")), &[]).is_err());
    }

    #[test]
    fn test_compare_accepts_saved_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("road.txt");
        std::fs::write(&script, PLAY).unwrap();

        let analyzer = ScriptAnalyzer::new();
        let analysis = load_analysis(&analyzer, &script).unwrap();
        let saved = dir.path().join("road.json");
        std::fs::write(&saved, serde_json::to_string(&analysis).unwrap()).unwrap();

        let reloaded = load_analysis(&analyzer, &saved).unwrap();
        assert_eq!(reloaded, analysis);

        let report = compare(&analysis, &reloaded).unwrap();
        assert!(report.same_protagonist());
        assert!(report.same_main_location());
    }

    #[test]
    fn test_check_file_reports_malformed_script() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("essay.txt");
        std::fs::write(&good, PLAY).unwrap();
        std::fs::write(&bad, "It was a dark and stormy night.").unwrap();

        let analyzer = ScriptAnalyzer::new();
        assert!(!check_file(&analyzer, &good).has_errors());

        let result = check_file(&analyzer, &bad);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.diagnostics[0].script_id, "essay");

        assert!(check_path(&analyzer, dir.path()).is_err());
    }

    #[test]
    fn test_render_analysis() {
        let analysis = ScriptAnalyzer::new().analyze("road", PLAY).unwrap();
        let text = render_analysis(&analysis);
        assert!(text.starts_with("《road》\n"));
        assert!(text.contains("主角: X"));
        assert!(text.contains("主要地点: A road"));
        assert!(text.contains("最长台词: X，10 词（第 1 幕第 1 场）"));

        // X 两轮共 13 词
        let x_row = text.lines().find(|l| l.trim_start().starts_with("X ")).unwrap();
        assert!(x_row.contains("6.5"), "{x_row}");
    }
}
