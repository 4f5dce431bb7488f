//! 单个录制文件的完整提取流程
//!
//! 解析 `.meta` → 计算样本窗口 → 映射拷贝到暂存文件 → 计算摘要 → 渲染新 `.meta`
//! → 依次提交 `.bin` 和 `.meta`。只有全部步骤成功，最终路径上才会出现文件。

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::binary::extract_window;
use super::digest::compute_sha1;
use super::staging::StagedFile;
use crate::error::{ExtractError, ExtractResult, io_error, range_error};
use crate::meta::{DerivedFields, parse_meta, render_extract_meta};
use crate::tools::constants::{defaults, meta_keys};
use crate::window::{SampleWindow, TimeRange, sample_window_for};

/// 一次提取的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub output_path: PathBuf,
    pub meta_path: PathBuf,
    /// 大写十六进制 SHA-1
    pub digest: String,
    pub total_bytes: u64,
    pub duration_seconds: f64,
    pub sample_rate: f64,
    pub window: SampleWindow,
}

/// `.bin` 对应的 `.meta` 路径（替换最后一个扩展名）
pub fn meta_path_for(bin_path: &Path) -> PathBuf {
    bin_path.with_extension(meta_keys::META_EXTENSION)
}

/// 尽量解析为绝对路径；目标文件尚不存在时解析其父目录
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// 拒绝把输出（`.bin` 或其 `.meta`）写回源文件
fn ensure_distinct(bin_in: &Path, bin_out: &Path) -> ExtractResult<()> {
    let pairs = [
        (bin_in.to_path_buf(), bin_out.to_path_buf()),
        (meta_path_for(bin_in), meta_path_for(bin_out)),
    ];
    for (input, output) in &pairs {
        if resolve_path(input) == resolve_path(output) {
            return Err(ExtractError::InvalidInput(format!(
                "输出路径与源文件相同 / output path is a source file: {}",
                input.display()
            )));
        }
    }
    Ok(())
}

/// 从 `bin_in`（及同名 `.meta`）中提取时间范围，写出 `bin_out` 和对应 `.meta`
///
/// 时间范围会取整到完整样本；提取文件从样本 0 开始，就像完整录制一样。
pub fn extract_bin(bin_in: &Path, bin_out: &Path, range: TimeRange) -> ExtractResult<ExtractionResult> {
    ensure_distinct(bin_in, bin_out)?;

    let meta_in = meta_path_for(bin_in);
    let meta_out = meta_path_for(bin_out);
    let meta = parse_meta(&meta_in)?;

    let (window, sample_rate) = sample_window_for(&meta, range)?;

    let staged_bin = extract_window(bin_in, bin_out, &window)?;

    // 映射已释放，摘要读到的是完整写入的字节
    let digest = compute_sha1(staged_bin.path(), defaults::DIGEST_CHUNK_SIZE)?;
    let total_bytes = window
        .byte_len()
        .ok_or_else(|| range_error(bin_out, format!("窗口字节跨度溢出 / window byte span overflows: {window:?}")))?;

    let written = staged_bin
        .file()
        .metadata()
        .map_err(|e| io_error("读取输出信息 / stat output", staged_bin.path(), e))?
        .len();
    if written != total_bytes {
        return Err(range_error(
            bin_out,
            format!("输出 {written} 字节，期望 {total_bytes} / wrote {written} bytes, expected {total_bytes}"),
        ));
    }

    let duration_seconds = range.duration();
    let derived = DerivedFields::for_extract(bin_out, &digest, total_bytes, duration_seconds);
    let staged_meta = StagedFile::with_text(&meta_out, &render_extract_meta(&meta_in, &derived)?)?;

    let output_path = staged_bin.commit()?;
    let meta_path = match staged_meta.commit() {
        Ok(path) => path,
        Err(e) => {
            // 没有匹配的 .meta 时不保留 .bin
            if let Err(remove_err) = std::fs::remove_file(&output_path) {
                tracing::warn!(path = %output_path.display(), error = %remove_err, "failed to remove orphaned output");
            }
            return Err(e);
        }
    };

    tracing::info!(
        output = %output_path.display(),
        %digest,
        total_bytes,
        duration_seconds,
        "extraction complete"
    );

    Ok(ExtractionResult {
        output_path,
        meta_path,
        digest,
        total_bytes,
        duration_seconds,
        sample_rate,
        window,
    })
}
