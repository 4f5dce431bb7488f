//! 行为事件日志裁剪
//!
//! 日志是空格分隔的文本：首个字段为十进制试次号（从1开始）的是试次行，
//! 否则是表头行。试次号为 0 的行是表尾。保留表头、表尾和范围内的试次行，
//! 并把范围内的试次重新编号为从 `0001` 开始。

use std::path::Path;

use crate::error::{ExtractError, ExtractResult, parse_error};
use crate::extract::StagedFile;

/// 试次范围（零基，两端包含）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TrialRange {
    pub start_trial: usize,
    pub end_trial: usize,
}

impl TrialRange {
    pub fn new(start_trial: usize, end_trial: usize) -> ExtractResult<Self> {
        if end_trial < start_trial {
            return Err(ExtractError::InvalidInput(format!(
                "试次范围无效 / invalid trial range: {start_trial}-{end_trial}"
            )));
        }
        Ok(Self {
            start_trial,
            end_trial,
        })
    }

    #[inline]
    pub fn contains(&self, trial_index: usize) -> bool {
        self.start_trial <= trial_index && trial_index <= self.end_trial
    }

    /// 范围内试次数
    #[inline]
    pub fn trial_count(&self) -> usize {
        self.end_trial - self.start_trial + 1
    }
}

/// 首字段解析为试次号；非纯数字返回 None
fn trial_number(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// 按试次范围过滤日志文本
pub fn filter_trial_lines(text: &str, range: TrialRange) -> String {
    let mut output = String::with_capacity(text.len() / 4);

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            continue;
        }

        let (first, rest) = line.split_once(' ').unwrap_or((line, ""));

        match trial_number(first) {
            // 表头 / 表尾（试次号 0）
            None | Some(0) => output.push_str(line),
            Some(n) => {
                let trial_index = (n - 1) as usize;
                if range.contains(trial_index) {
                    let shifted = trial_index - range.start_trial + 1;
                    output.push_str(&format!("{shifted:04} {rest}"));
                }
            }
        }
    }

    output
}

/// 裁剪行为事件 `.txt` 文件到给定试次范围
pub fn extract_behavior_events(
    events_in: &Path,
    events_out: &Path,
    range: TrialRange,
) -> ExtractResult<()> {
    tracing::info!(
        from = %events_in.display(),
        to = %events_out.display(),
        start_trial = range.start_trial,
        end_trial = range.end_trial,
        "extracting behavior events"
    );

    let text = std::fs::read_to_string(events_in)
        .map_err(|e| parse_error(events_in, format!("无法读取 / cannot read: {e}")))?;
    let filtered = filter_trial_lines(&text, range);

    StagedFile::with_text(events_out, &filtered)?.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
Mouse AS20 trainingSingle6Tone2024
trial time tone resp

0001 12.5 3 1
0002 18.0 5 0
0003 24.1 2 1
0004 30.7 6 1
0005 36.2 1 0
0000 summary 5 trials
";

    #[test]
    fn test_keeps_header_footer_and_renumbers() {
        let out = filter_trial_lines(LOG, TrialRange::new(1, 3).unwrap());
        let expected = "\
Mouse AS20 trainingSingle6Tone2024
trial time tone resp
0001 18.0 5 0
0002 24.1 2 1
0003 30.7 6 1
0000 summary 5 trials
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_range_from_zero_keeps_numbers() {
        let out = filter_trial_lines(LOG, TrialRange::new(0, 0).unwrap());
        assert!(out.contains("0001 12.5 3 1\n"));
        assert!(!out.contains("18.0"));
    }

    #[test]
    fn test_range_beyond_log_keeps_only_header_and_footer() {
        let out = filter_trial_lines(LOG, TrialRange::new(10, 20).unwrap());
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_invalid_range() {
        assert!(TrialRange::new(3, 1).is_err());
        assert_eq!(TrialRange::new(0, 3).unwrap().trial_count(), 4);
    }

    #[test]
    fn test_extract_behavior_events_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("log.txt");
        let output = dir.path().join("minimal/behavior/log.txt");
        std::fs::write(&input, LOG).unwrap();

        extract_behavior_events(&input, &output, TrialRange::new(0, 1).unwrap()).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Mouse AS20"));
        assert!(text.contains("0002 18.0 5 0\n"));
        assert!(!text.contains("24.1"));
    }
}
