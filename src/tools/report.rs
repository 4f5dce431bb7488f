//! 结果汇总输出
//!
//! 控制台表格（comfy-table）和可选的 JSON 摘要文件。

use std::path::Path;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};

use super::processor::JobOutcome;
use super::utils;
use crate::error::{ExtractResult, io_error};
use crate::extract::StagedFile;

/// 生成提取结果表格
pub fn format_summary_table(outcome: &JobOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File / 文件",
        "Samples / 样本",
        "Channels / 通道",
        "Bytes / 字节",
        "SHA1",
    ]);

    for result in &outcome.extractions {
        table.add_row(vec![
            Cell::new(utils::extract_filename_lossy(&result.output_path)),
            Cell::new(format!(
                "{}-{} ({})",
                result.window.start_sample, result.window.end_sample, result.window.sample_count
            ))
            .set_alignment(CellAlignment::Right),
            Cell::new(result.window.channel_count).set_alignment(CellAlignment::Right),
            Cell::new(result.total_bytes).set_alignment(CellAlignment::Right),
            Cell::new(&result.digest),
        ]);
    }

    table
}

/// 打印汇总
pub fn show_summary(outcome: &JobOutcome) {
    println!(
        "📊 时间范围 / time range: {}s - {}s ({}s)",
        outcome.time_range.start_time,
        outcome.time_range.end_time,
        outcome.time_range.duration()
    );
    if let Some(path) = &outcome.behavior_events {
        println!("📝 行为日志 / behavior log: {}", path.display());
    }
    println!("{}", format_summary_table(outcome));
}

/// 写出 JSON 摘要（暂存后原子提交）
pub fn write_summary_json(path: &Path, outcome: &JobOutcome) -> ExtractResult<()> {
    let json = serde_json::to_string_pretty(outcome)
        .map_err(|e| io_error("序列化摘要 / serialize summary", path, e.into()))?;
    StagedFile::with_text(path, &json)?.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionResult;
    use crate::window::{SampleWindow, TimeRange};
    use std::path::PathBuf;

    fn outcome() -> JobOutcome {
        JobOutcome {
            time_range: TimeRange {
                start_time: 0.5,
                end_time: 10.5,
            },
            behavior_events: None,
            extractions: vec![ExtractionResult {
                output_path: PathBuf::from("out/ecephys/run.nidq.bin"),
                meta_path: PathBuf::from("out/ecephys/run.nidq.meta"),
                digest: "ABCDEF".to_string(),
                total_bytes: 80008,
                duration_seconds: 10.0,
                sample_rate: 1000.0,
                window: SampleWindow {
                    start_sample: 500,
                    end_sample: 10500,
                    sample_count: 10001,
                    channel_count: 4,
                },
            }],
        }
    }

    #[test]
    fn test_table_contains_results() {
        let rendered = format_summary_table(&outcome()).to_string();
        assert!(rendered.contains("run.nidq.bin"));
        assert!(rendered.contains("80008"));
        assert!(rendered.contains("ABCDEF"));
    }

    #[test]
    fn test_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &outcome()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["extractions"][0]["total_bytes"], 80008);
        assert_eq!(value["extractions"][0]["window"]["sample_count"], 10001);
        assert_eq!(value["time_range"]["start_time"], 0.5);
    }
}
