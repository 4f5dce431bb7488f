//! 事件时间与时间范围
//!
//! 事件时间文件（如 CatGT 输出的 `*.xd_8_3_0.txt`）每行一个秒数，升序排列。
//! 按零基索引选取起止事件，再向两侧各扩展一段填充时长。

use std::path::Path;

use crate::error::{ExtractError, ExtractResult, io_error, parse_error};

/// 提取时间范围（秒）
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TimeRange {
    pub start_time: f64,
    pub end_time: f64,
}

impl TimeRange {
    /// 范围时长（秒）
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// 解析事件时间文本（空白分隔的浮点数，空行忽略）
pub fn parse_event_times(source: &Path, text: &str) -> ExtractResult<Vec<f64>> {
    let mut times = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                parse_error(
                    source,
                    format!("第{n}行不是数字 / line {n} is not a number: `{token}`", n = line_no + 1),
                )
            })?;
            times.push(value);
        }
    }

    Ok(times)
}

/// 读取事件时间文件
pub fn read_event_times(path: &Path) -> ExtractResult<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| io_error("读取事件文件 / read events", path, e))?;
    parse_event_times(path, &text)
}

/// 由事件索引和填充时长计算时间范围
///
/// 返回 `(events[start_event] - padding, events[end_event] + padding)`，不对输入
/// 做重排或去重。
///
/// # 错误
///
/// * `ExtractError::Index` - 任一索引不在 `[0, len)` 内
/// * `ExtractError::InvalidInput` - 填充为负数/非有限值，或结束索引小于起始索引
pub fn resolve_time_range(
    events: &[f64],
    start_event: usize,
    end_event: usize,
    padding_seconds: f64,
) -> ExtractResult<TimeRange> {
    if !padding_seconds.is_finite() || padding_seconds < 0.0 {
        return Err(ExtractError::InvalidInput(format!(
            "填充时长必须为非负数 / padding must be non-negative, got {padding_seconds}"
        )));
    }

    let start = *events.get(start_event).ok_or(ExtractError::Index {
        index: start_event,
        len: events.len(),
    })?;
    let end = *events.get(end_event).ok_or(ExtractError::Index {
        index: end_event,
        len: events.len(),
    })?;

    if end_event < start_event {
        return Err(ExtractError::InvalidInput(format!(
            "结束事件 {end_event} 早于起始事件 {start_event} / end event precedes start event"
        )));
    }

    let range = TimeRange {
        start_time: start - padding_seconds,
        end_time: end + padding_seconds,
    };

    tracing::info!(
        start_event,
        end_event,
        padding_seconds,
        start_time = range.start_time,
        end_time = range.end_time,
        duration = range.duration(),
        "resolved event time range"
    );

    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [f64; 4] = [2.0, 5.0, 9.0, 20.0];

    #[test]
    fn test_resolve_concrete_range() {
        let range = resolve_time_range(&EVENTS, 0, 2, 1.5).unwrap();
        assert_eq!(range.start_time, 0.5);
        assert_eq!(range.end_time, 10.5);
        assert_eq!(range.duration(), 10.0);
    }

    #[test]
    fn test_same_event_zero_padding() {
        let range = resolve_time_range(&EVENTS, 3, 3, 0.0).unwrap();
        assert_eq!(range.start_time, range.end_time);
    }

    #[test]
    fn test_start_never_exceeds_end() {
        for start in 0..EVENTS.len() {
            for end in start..EVENTS.len() {
                for padding in [0.0, 0.25, 1.5, 100.0] {
                    let range = resolve_time_range(&EVENTS, start, end, padding).unwrap();
                    assert!(range.start_time <= range.end_time, "{start}-{end} ±{padding}");
                }
            }
        }
    }

    #[test]
    fn test_index_out_of_bounds() {
        match resolve_time_range(&EVENTS, 0, 4, 1.0) {
            Err(ExtractError::Index { index, len }) => {
                assert_eq!(index, 4);
                assert_eq!(len, 4);
            }
            other => panic!("期望索引错误，实际: {other:?}"),
        }

        assert!(matches!(
            resolve_time_range(&[], 0, 0, 0.0),
            Err(ExtractError::Index { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_invalid_padding_and_order() {
        assert!(matches!(
            resolve_time_range(&EVENTS, 0, 1, -0.5),
            Err(ExtractError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_time_range(&EVENTS, 0, 1, f64::NAN),
            Err(ExtractError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_time_range(&EVENTS, 2, 1, 0.0),
            Err(ExtractError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_event_times() {
        let times = parse_event_times(Path::new("e.txt"), "2.0\n5.0\n\n9.0\n20\n").unwrap();
        assert_eq!(times, vec![2.0, 5.0, 9.0, 20.0]);

        let err = parse_event_times(Path::new("e.txt"), "1.0\nabc\n").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_unreadable_events_file_is_io_error() {
        assert!(matches!(
            read_event_times(Path::new("/nonexistent/events.txt")),
            Err(ExtractError::Io { .. })
        ));
    }
}
