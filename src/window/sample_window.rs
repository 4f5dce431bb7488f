//! 样本窗口计算
//!
//! 把时间范围换算成整数样本窗口：起点向下取整、终点向上取整，两端都包含，
//! 恰好落在样本边界上的事件不会被截掉。

use std::path::Path;

use super::events::TimeRange;
use crate::error::{ExtractError, ExtractResult, range_error};
use crate::meta::MetadataRecord;
use crate::tools::constants::sample_format::SAMPLE_WIDTH_BYTES;

/// 样本窗口（绝对样本单位，两端包含）
///
/// 不变量：`start_sample <= end_sample`，`sample_count = end_sample - start_sample + 1`，
/// 且窗口对应的字节跨度不会溢出 `u64`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SampleWindow {
    pub start_sample: u64,
    pub end_sample: u64,
    pub sample_count: u64,
    pub channel_count: usize,
}

impl SampleWindow {
    /// 一行（一个时间点、全部通道）的字节数
    #[inline]
    pub fn row_bytes(&self) -> Option<u64> {
        (self.channel_count as u64).checked_mul(SAMPLE_WIDTH_BYTES as u64)
    }

    /// 窗口在源文件中的起始字节偏移
    #[inline]
    pub fn byte_offset(&self) -> Option<u64> {
        self.start_sample.checked_mul(self.row_bytes()?)
    }

    /// 输出文件的字节数：`sample_count × channel_count × 2`
    #[inline]
    pub fn byte_len(&self) -> Option<u64> {
        self.sample_count.checked_mul(self.row_bytes()?)
    }

    /// 源文件至少需要的字节数
    ///
    /// 字段是公开的，手工构造的窗口可能溢出，此时返回 `None`。
    #[inline]
    pub fn required_source_bytes(&self) -> Option<u64> {
        self.byte_offset()?.checked_add(self.byte_len()?)
    }
}

/// 由时间范围、采样率和通道数计算样本窗口
///
/// `source` 只用于错误上下文。
///
/// # 错误
///
/// * `ExtractError::InvalidInput` - 采样率/通道数无效，或 `end_time < start_time`
/// * `ExtractError::Range` - 起始样本为负，或窗口字节跨度溢出
pub fn calculate_sample_window(
    range: TimeRange,
    sample_rate: f64,
    channel_count: usize,
    source: &Path,
) -> ExtractResult<SampleWindow> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ExtractError::InvalidInput(format!(
            "采样率无效 / invalid sample rate: {sample_rate}"
        )));
    }
    if channel_count == 0 {
        return Err(ExtractError::InvalidInput(
            "通道数必须为正 / channel count must be positive".to_string(),
        ));
    }
    if !(range.end_time >= range.start_time) {
        return Err(ExtractError::InvalidInput(format!(
            "时间范围无效 / invalid time range: {}s - {}s",
            range.start_time, range.end_time
        )));
    }

    let start = (range.start_time * sample_rate).floor();
    let end = (range.end_time * sample_rate).ceil();

    if start < 0.0 {
        return Err(range_error(
            source,
            format!(
                "起始样本为负 / start sample {start} is negative (start_time {}s)",
                range.start_time
            ),
        ));
    }
    if !end.is_finite() || end >= u64::MAX as f64 {
        return Err(range_error(
            source,
            format!("结束样本过大 / end sample {end} is too large"),
        ));
    }

    let start_sample = start as u64;
    let end_sample = end as u64;
    let sample_count = end_sample - start_sample + 1;

    let row_bytes = channel_count as u64 * SAMPLE_WIDTH_BYTES as u64;
    if (start_sample + sample_count).checked_mul(row_bytes).is_none() {
        return Err(range_error(
            source,
            format!("窗口字节跨度溢出 / window byte span overflows: samples {start_sample}-{end_sample}"),
        ));
    }

    Ok(SampleWindow {
        start_sample,
        end_sample,
        sample_count,
        channel_count,
    })
}

/// 从元数据读取采样率和通道数并计算窗口，同时返回使用的采样率
pub fn sample_window_for(
    meta: &MetadataRecord,
    range: TimeRange,
) -> ExtractResult<(SampleWindow, f64)> {
    let sample_rate = meta.sample_rate()?;
    let channel_count = meta.channel_count()?;
    let window = calculate_sample_window(range, sample_rate, channel_count, meta.source())?;

    tracing::info!(
        source = %meta.source().display(),
        sample_rate,
        channel_count,
        start_sample = window.start_sample,
        end_sample = window.end_sample,
        sample_count = window.sample_count,
        "computed sample window"
    );

    Ok((window, sample_rate))
}
