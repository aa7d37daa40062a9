// ==========================================
// 例会分桌轮换系统 - 命令行入口
// ==========================================
// 子命令:
// - assign          名册 + 历史 → 分桌结果 CSV / 评估文本 / 结论 JSON
// - commit          分桌结果 CSV → 历史卓番（同月只能一次）
// - import-history  旧历史文件 → 历史卓番
// ==========================================

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use seating_rotation::config::{
    config_keys, default_history_db_path, FileSettingsReader, InMemorySettingsReader, RunSettings,
    SettingsReader,
};
use seating_rotation::domain::PastSeatingRecord;
use seating_rotation::engine::{assign_tables, SeededRandom};
use seating_rotation::export::{read_back, write_findings_json, AssignmentCsvWriter, EvaluationReport};
use seating_rotation::i18n::{self, t_in};
use seating_rotation::importer::{window_records, HistoryImporter, RosterImport, RosterImporter};
use seating_rotation::repository::HistoryRepository;
use seating_rotation::{logging, YearMonth, APP_NAME, VERSION};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "seating-rotation", version, about = "例会分桌轮换系统")]
struct Cli {
    /// 输出语言 (ja / zh-CN / en)
    #[arg(long, global = true, default_value = i18n::DEFAULT_LOCALE)]
    locale: String,

    /// JSON 格式日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 生成分桌方案与评估
    Assign(AssignArgs),
    /// 登记分桌结果到历史
    Commit(CommitArgs),
    /// 导入旧历史文件
    ImportHistory(ImportHistoryArgs),
}

/// 设定来源：设定文件 + 命令行覆写
#[derive(Debug, Clone, Args)]
struct SettingsArgs {
    /// 设定文件（第一列键，第二列值）
    #[arg(long)]
    settings: Option<PathBuf>,

    /// 自会场名
    #[arg(long)]
    self_venue: Option<String>,

    /// 轮换次数
    #[arg(long)]
    rotations: Option<u32>,

    /// 桌数
    #[arg(long)]
    tables: Option<u32>,

    /// 今月 (YYYYMM)
    #[arg(long, value_parser = parse_month)]
    month: Option<YearMonth>,
}

#[derive(Debug, Clone, Args)]
struct AssignArgs {
    /// 名册文件 (CSV / Excel)
    #[arg(long)]
    roster: PathBuf,

    /// 历史文件；省略时读取历史数据库
    #[arg(long)]
    history: Option<PathBuf>,

    /// 历史数据库路径
    #[arg(long, env = "SEATING_ROTATION_DB_PATH")]
    db: Option<PathBuf>,

    /// 随机种子（固定后结果可复现）
    #[arg(long)]
    seed: Option<u64>,

    /// 分桌结果 CSV
    #[arg(long, short)]
    output: PathBuf,

    /// 评估文本
    #[arg(long)]
    report: Option<PathBuf>,

    /// 结论 JSON
    #[arg(long)]
    findings_json: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Clone, Args)]
struct CommitArgs {
    /// 分桌结果 CSV
    #[arg(long)]
    assignment: PathBuf,

    /// 登记的开催月 (YYYYMM)；省略时取设定的今月
    #[arg(long, value_parser = parse_month)]
    month: Option<YearMonth>,

    /// 设定文件（用于读取今月）
    #[arg(long)]
    settings: Option<PathBuf>,

    /// 历史数据库路径
    #[arg(long, env = "SEATING_ROTATION_DB_PATH")]
    db: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ImportHistoryArgs {
    /// 旧历史文件 (開催月 / 卓番 / 名前 / 所属会場)
    #[arg(long)]
    file: PathBuf,

    /// 历史数据库路径
    #[arg(long, env = "SEATING_ROTATION_DB_PATH")]
    db: Option<PathBuf>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("seating-rotation error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    info!("{} v{}", APP_NAME, VERSION);

    let locale = if i18n::is_supported(&cli.locale) {
        cli.locale.clone()
    } else {
        warn!(locale = %cli.locale, "不支持的语言，使用默认语言");
        i18n::DEFAULT_LOCALE.to_string()
    };
    i18n::set_locale(&locale);

    match &cli.command {
        Commands::Assign(args) => run_assign(args, &locale),
        Commands::Commit(args) => run_commit(args, &locale),
        Commands::ImportHistory(args) => run_import_history(args, &locale),
    }
}

// ==========================================
// assign
// ==========================================
fn run_assign(args: &AssignArgs, locale: &str) -> anyhow::Result<()> {
    let run_settings = resolve_settings(&args.settings)?;
    let self_venue = run_settings.settings.self_venue_name.clone();
    let current_month = run_settings.current_month;

    let (roster, history) = match &args.history {
        Some(history_path) => {
            let imported = HistoryImporter::new()
                .import_file(history_path)
                .with_context(|| format!("历史文件读取失败: {}", history_path.display()))?;
            let roster = import_roster(&args.roster, &self_venue, &imported)?;
            (roster, window_records(&imported.rows, &current_month))
        }
        None => {
            let repo = open_repository(args.db.as_deref())?;
            let roster = import_roster(&args.roster, &self_venue, &repo)?;
            let history: Vec<PastSeatingRecord> = repo
                .load_window(&current_month)
                .context("历史卓番读取失败")?;
            (roster, history)
        }
    };

    for issue in &roster.issues {
        warn!(row = issue.row_number, reason = %issue.reason, "名册行未参加分桌");
    }

    let mut rng = match args.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_entropy(),
    };
    let outcome = assign_tables(
        &roster.participants,
        &history,
        &run_settings.settings,
        &mut rng,
    )
    .context("分桌失败")?;

    AssignmentCsvWriter::new(locale)
        .write_file(&args.output, &outcome.rows)
        .with_context(|| format!("分桌结果写出失败: {}", args.output.display()))?;

    let report = EvaluationReport::new(locale);
    if let Some(path) = &args.report {
        report
            .write_file(path, &outcome.findings)
            .with_context(|| format!("评估文本写出失败: {}", path.display()))?;
    }
    if let Some(path) = &args.findings_json {
        let file = File::create(path)
            .with_context(|| format!("结论 JSON 创建失败: {}", path.display()))?;
        write_findings_json(BufWriter::new(file), &outcome.findings)?;
    }

    for line in report.summary(&outcome.findings, run_settings.settings.rotation_count) {
        println!("{}", line);
    }
    println!(
        "{}",
        t_in(
            locale,
            "cli.assigned",
            &[
                ("rotations", &run_settings.settings.rotation_count.to_string()),
                ("path", &args.output.display().to_string()),
            ],
        )
    );
    Ok(())
}

fn import_roster<V: seating_rotation::importer::VenueLookup>(
    path: &Path,
    self_venue: &str,
    venues: &V,
) -> anyhow::Result<RosterImport> {
    RosterImporter::new(self_venue, venues)
        .import_file(path)
        .with_context(|| format!("名册读取失败: {}", path.display()))
}

// ==========================================
// commit
// ==========================================
fn run_commit(args: &CommitArgs, locale: &str) -> anyhow::Result<()> {
    let month = match (args.month, &args.settings) {
        (Some(month), _) => month,
        (None, Some(path)) => FileSettingsReader::from_file(path)
            .with_context(|| format!("设定文件读取失败: {}", path.display()))?
            .current_month()?
            .unwrap_or_else(YearMonth::current),
        (None, None) => YearMonth::current(),
    };

    let rows = read_back(&args.assignment)
        .with_context(|| format!("分桌结果读取失败: {}", args.assignment.display()))?;
    let repo = open_repository(args.db.as_deref())?;
    let committed = repo
        .append_month(&month, &rows)
        .with_context(|| format!("{} 的登记失败", month))?;

    println!(
        "{}",
        t_in(
            locale,
            "cli.committed",
            &[("month", &month.to_string()), ("rows", &committed.to_string())],
        )
    );
    Ok(())
}

// ==========================================
// import-history
// ==========================================
fn run_import_history(args: &ImportHistoryArgs, locale: &str) -> anyhow::Result<()> {
    let imported = HistoryImporter::new()
        .import_file(&args.file)
        .with_context(|| format!("历史文件读取失败: {}", args.file.display()))?;
    let repo = open_repository(args.db.as_deref())?;
    let summary = repo.import_records(&imported.rows)?;

    for month in &summary.skipped_months {
        warn!(month = %month, "已存在的开催月未导入");
    }
    println!(
        "{}",
        t_in(
            locale,
            "cli.imported",
            &[("rows", &summary.inserted.to_string())],
        )
    );
    Ok(())
}

// ==========================================
// 公共
// ==========================================
fn resolve_settings(args: &SettingsArgs) -> anyhow::Result<RunSettings> {
    let base = match &args.settings {
        Some(path) => FileSettingsReader::from_file(path)
            .with_context(|| format!("设定文件读取失败: {}", path.display()))?
            .load_run_settings()?,
        None => {
            let mut reader = InMemorySettingsReader::new();
            if let Some(venue) = &args.self_venue {
                reader = reader.with(config_keys::SELF_VENUE[0], venue);
            }
            if let Some(count) = args.rotations {
                reader = reader.with(config_keys::ROTATION_COUNT[0], count);
            }
            if let Some(count) = args.tables {
                reader = reader.with(config_keys::TABLE_COUNT[0], count);
            }
            reader
                .load_run_settings()
                .context("未指定设定文件时需要 --self-venue / --rotations / --tables")?
        }
    };

    let settings = base.with_overrides(
        args.self_venue.clone(),
        args.rotations,
        args.tables,
        args.month,
    );
    settings.validate()?;
    info!(
        self_venue = %settings.settings.self_venue_name,
        rotations = settings.settings.rotation_count,
        tables = settings.settings.table_count,
        current_month = %settings.current_month,
        "运行设定"
    );
    Ok(settings)
}

fn open_repository(db: Option<&Path>) -> anyhow::Result<HistoryRepository> {
    let path = db.map(Path::to_path_buf).unwrap_or_else(default_history_db_path);
    if path.as_os_str().is_empty() {
        bail!("历史数据库路径为空");
    }
    HistoryRepository::new(&path)
        .with_context(|| format!("历史数据库打开失败: {}", path.display()))
}

fn parse_month(raw: &str) -> Result<YearMonth, String> {
    YearMonth::parse(raw).ok_or_else(|| format!("开催月必须是 YYYYMM 形式: {}", raw))
}
