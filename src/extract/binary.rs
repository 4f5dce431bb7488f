//! 二进制窗口提取
//!
//! 只读映射源 `.bin`，把 `[start_sample, end_sample]` 行区间一次性拷贝到预先定长的
//! 可写映射中，刷盘后交出暂存文件。多GB的录制文件绝不整读进内存。

use std::path::Path;

use super::mapped::{DestinationView, SourceView};
use super::staging::StagedFile;
use crate::error::{ExtractError, ExtractResult, range_error};
use crate::window::SampleWindow;

/// 提取样本窗口到暂存文件
///
/// 返回的 [`StagedFile`] 已刷盘、映射已释放，可以安全地计算摘要；调用方决定何时
/// `commit` 到 `destination`。源文件只以只读方式打开。
///
/// # 错误
///
/// * `ExtractError::InvalidInput` - 窗口自身不一致
/// * `ExtractError::Range` - 窗口字节跨度溢出 `u64`，或源文件不足 `(start_sample + sample_count) × channel_count × 2` 字节
/// * `ExtractError::Io` - 打开、映射、创建或刷盘失败
pub fn extract_window(
    source: &Path,
    destination: &Path,
    window: &SampleWindow,
) -> ExtractResult<StagedFile> {
    if window.end_sample < window.start_sample
        || window.sample_count != window.end_sample - window.start_sample + 1
    {
        return Err(ExtractError::InvalidInput(format!(
            "样本窗口不一致 / inconsistent sample window: {window:?}"
        )));
    }

    let (required_bytes, byte_len) = match (window.required_source_bytes(), window.byte_len()) {
        (Some(required), Some(len)) => (required, len),
        _ => {
            return Err(range_error(
                source,
                format!("窗口字节跨度溢出 / window byte span overflows: {window:?}"),
            ));
        }
    };

    tracing::info!(
        from = %source.display(),
        to = %destination.display(),
        start_sample = window.start_sample,
        end_sample = window.end_sample,
        channels = window.channel_count,
        bytes = byte_len,
        "extracting sample window"
    );

    let source_view =
        SourceView::open(source, window.channel_count, required_bytes)?;
    let rows = source_view.rows(window.start_sample, window.sample_count)?;

    let mut destination_view = DestinationView::create(destination, byte_len)?;
    destination_view.copy_from(rows)?;
    let staged = destination_view.finish()?;

    Ok(staged)
}
