//! 任务处理模块
//!
//! 按配置依次完成：事件时间范围 → 行为日志裁剪 → 各录制文件提取。
//! 单线程顺序执行，任一步失败立即中止。

use std::path::PathBuf;

use serde::Serialize;

use super::cli::AppConfig;
use super::utils;
use crate::behavior::extract_behavior_events;
use crate::error::ExtractResult;
use crate::extract::{ExtractionResult, extract_bin};
use crate::window::{TimeRange, read_event_times, resolve_time_range};

/// 一次任务的全部输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome {
    pub time_range: TimeRange,
    pub behavior_events: Option<PathBuf>,
    pub extractions: Vec<ExtractionResult>,
}

/// 执行一次完整的裁剪任务
pub fn process_job(config: &AppConfig) -> ExtractResult<JobOutcome> {
    let events = read_event_times(&config.trial_events)?;
    let time_range = resolve_time_range(
        &events,
        config.start_event,
        config.end_event,
        config.padding_seconds,
    )?;

    if config.verbose {
        println!(
            "⏱️  事件 / events {}-{} ±{}s: {}s - {}s ({}s)",
            config.start_event,
            config.end_event,
            config.padding_seconds,
            time_range.start_time,
            time_range.end_time,
            time_range.duration()
        );
    }

    let behavior_events = match &config.behavior_events {
        Some(events_in) => {
            let events_out = config.behavior_output_path(events_in);
            extract_behavior_events(events_in, &events_out, config.trial_range()?)?;
            Some(events_out)
        }
        None => None,
    };

    let mut extractions = Vec::with_capacity(config.recordings.len());
    for (index, recording) in config.recordings.iter().enumerate() {
        if config.verbose {
            println!(
                "[PROCESSING] [{}/{}] 处理 / Processing: {}",
                index + 1,
                config.recordings.len(),
                utils::extract_filename_lossy(recording)
            );
        }

        let bin_out = config.recording_output_path(recording);
        let result = extract_bin(recording, &bin_out, time_range)?;

        if config.verbose {
            println!(
                "   [OK] 样本 / samples {}-{} ({}), {} bytes",
                result.window.start_sample,
                result.window.end_sample,
                result.window.sample_count,
                result.total_bytes
            );
        }
        extractions.push(result);
    }

    Ok(JobOutcome {
        time_range,
        behavior_events,
        extractions,
    })
}
