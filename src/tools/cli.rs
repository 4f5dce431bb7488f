//! 命令行接口模块
//!
//! 负责命令行参数解析、JSON任务文件合并和程序信息展示。
//! 命令行显式给出的值优先于任务文件。

use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::Deserialize;

use super::constants::defaults;
use super::locator::{LocateConfig, locate_unique};
use super::utils;
use crate::behavior::TrialRange;
use crate::error::{ExtractError, ExtractResult, parse_error};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置（合并命令行与任务文件后的最终值）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 输出根目录（其下为 `behavior/` 与 `ecephys/`）
    pub output_dir: PathBuf,

    /// 试次事件时间文件
    pub trial_events: PathBuf,

    /// 待提取的 `.bin` 录制文件
    pub recordings: Vec<PathBuf>,

    /// 录制文件的根目录，用于在输出中保留相对路径
    pub recording_root: Option<PathBuf>,

    /// 行为事件日志（可选）
    pub behavior_events: Option<PathBuf>,

    pub start_event: usize,
    pub end_event: usize,
    pub padding_seconds: f64,

    /// JSON 摘要输出路径（可选）
    pub summary_path: Option<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 行为日志使用与事件相同的试次范围
    pub fn trial_range(&self) -> ExtractResult<TrialRange> {
        TrialRange::new(self.start_event, self.end_event)
    }

    /// 录制文件的输出路径：`<output>/ecephys/<相对路径或文件名>`
    pub fn recording_output_path(&self, recording: &Path) -> PathBuf {
        let relative = self
            .recording_root
            .as_deref()
            .and_then(|root| recording.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(utils::extract_filename_lossy(recording)));

        self.output_dir.join(defaults::ECEPHYS_SUBDIR).join(relative)
    }

    /// 行为日志的输出路径：`<output>/behavior/<文件名>`
    pub fn behavior_output_path(&self, events: &Path) -> PathBuf {
        self.output_dir
            .join(defaults::BEHAVIOR_SUBDIR)
            .join(utils::extract_filename_lossy(events))
    }
}

/// JSON 任务文件（所有字段可选）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub output_dir: Option<PathBuf>,
    pub trial_events: Option<PathBuf>,
    #[serde(default)]
    pub recordings: Vec<PathBuf>,
    pub recording_root: Option<PathBuf>,
    pub behavior_events: Option<PathBuf>,
    pub start_event: Option<usize>,
    pub end_event: Option<usize>,
    pub padding_seconds: Option<f64>,
    pub summary: Option<PathBuf>,
    pub locate: Option<LocateConfig>,
}

/// 读取 JSON 任务文件
pub fn load_job_config(path: &Path) -> ExtractResult<JobConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| parse_error(path, format!("无法读取 / cannot read: {e}")))?;
    serde_json::from_str(&text).map_err(|e| parse_error(path, format!("JSON无效 / invalid JSON: {e}")))
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("minimal-ecephys")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("MacinMeter Team")
        .arg(
            Arg::new("RECORDINGS")
                .help("SpikeGLX .bin 录制文件（同目录下需有同名 .meta）")
                .num_args(0..)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("events")
                .long("events")
                .short('e')
                .help("试次事件时间文件（每行一个秒数）")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出目录")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("start-event")
                .long("start-event")
                .help("起始事件索引，零基 [默认: 0]")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("end-event")
                .long("end-event")
                .help("结束事件索引，零基且包含 [默认: 3]")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("padding")
                .long("padding")
                .help("起止事件前后的填充秒数 [默认: 1.5]")
                .value_name("SECS")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("behavior-txt")
                .long("behavior-txt")
                .help("按同一试次范围裁剪的行为日志")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recording-root")
                .long("recording-root")
                .help("录制根目录，输出中保留相对路径")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON任务文件")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("把提取结果写入JSON摘要文件")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(ArgAction::SetTrue),
        )
}

/// 由已解析的参数（及可选任务文件）生成配置
pub fn config_from_matches(matches: &ArgMatches) -> ExtractResult<AppConfig> {
    let job = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_job_config(path)?,
        None => JobConfig::default(),
    };
    merge_config(matches, job)
}

/// 只有命令行和任务文件都没给出时才按 `(根目录, 模式)` 查找
fn locate_missing(
    given: Option<PathBuf>,
    target: Option<(&Path, &str)>,
) -> ExtractResult<Option<PathBuf>> {
    match (given, target) {
        (Some(path), _) => Ok(Some(path)),
        (None, Some((root, pattern))) => locate_unique(root, pattern).map(Some),
        (None, None) => Ok(None),
    }
}

fn merge_config(matches: &ArgMatches, job: JobConfig) -> ExtractResult<AppConfig> {
    let arg_path = |id: &str| matches.get_one::<PathBuf>(id).cloned();
    let locate = job.locate.as_ref();

    let output_dir = arg_path("output").or(job.output_dir).ok_or_else(|| {
        ExtractError::InvalidInput("缺少输出目录 / missing --output".to_string())
    })?;

    let trial_events = locate_missing(
        arg_path("events").or(job.trial_events),
        locate.map(|l| (l.tprime_root.as_path(), l.trial_events_pattern.as_str())),
    )?
    .ok_or_else(|| ExtractError::InvalidInput("缺少事件文件 / missing --events".to_string()))?;

    let cli_recordings: Vec<PathBuf> = matches
        .get_many::<PathBuf>("RECORDINGS")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let recordings = if !cli_recordings.is_empty() {
        cli_recordings
    } else if !job.recordings.is_empty() {
        job.recordings
    } else if let Some(config) = locate {
        vec![
            locate_unique(&config.spikeglx_root, &config.spikeglx_nidq_pattern)?,
            locate_unique(&config.spikeglx_root, &config.spikeglx_ap_pattern)?,
        ]
    } else {
        return Err(ExtractError::InvalidInput(
            "至少需要一个录制文件 / at least one recording .bin is required".to_string(),
        ));
    };

    let recording_root = arg_path("recording-root")
        .or(job.recording_root)
        .or_else(|| locate.map(|l| l.spikeglx_root.clone()));

    let behavior_events = locate_missing(
        arg_path("behavior-txt").or(job.behavior_events),
        locate.map(|l| (l.behavior_root.as_path(), l.behavior_txt_pattern.as_str())),
    )?;

    let start_event = matches
        .get_one::<usize>("start-event")
        .copied()
        .or(job.start_event)
        .unwrap_or(defaults::START_EVENT);
    let end_event = matches
        .get_one::<usize>("end-event")
        .copied()
        .or(job.end_event)
        .unwrap_or(defaults::END_EVENT);
    let padding_seconds = matches
        .get_one::<f64>("padding")
        .copied()
        .or(job.padding_seconds)
        .unwrap_or(defaults::PADDING_SECONDS);

    Ok(AppConfig {
        output_dir,
        trial_events,
        recordings,
        recording_root,
        behavior_events,
        start_event,
        end_event,
        padding_seconds,
        summary_path: arg_path("summary").or(job.summary),
        verbose: matches.get_flag("verbose"),
    })
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("🚀 minimal-ecephys v{VERSION} 启动 / starting");
    println!("📝 {DESCRIPTION}");
    if config.verbose {
        println!(
            "🎯 事件 / events {}-{} ±{}s, {} 个录制文件 / recordings",
            config.start_event,
            config.end_event,
            config.padding_seconds,
            config.recordings.len()
        );
        println!("📁 输出目录 / output: {}", config.output_dir.display());
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("✅ 所有任务处理完成！/ All done!");
    }
}
