//! 元数据重写
//!
//! 为提取出的 `.bin` 重新生成 `.meta`：逐行复制原文件，命中重写表的行
//! 替换为派生值，其余行（包括未知的自定义字段）原样透传，最后追加一行
//! 提取标记，使其能与原始录制区分。

use std::path::Path;

use chrono::{Local, NaiveDateTime, Timelike};

use super::parser::read_meta_text;
use crate::error::{ExtractResult, io_error};
use crate::tools::constants::meta_keys;
use crate::tools::utils::{format_float, to_posix_string};

/// `fileCreateTime` 的格式（ISO-8601，秒精度）
const CREATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 提取结果的派生字段
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    /// 目标 `.bin` 路径（正斜杠分隔）
    pub output_file_name: String,
    /// 大写十六进制 SHA-1
    pub output_digest: String,
    pub output_size_bytes: u64,
    pub output_duration_seconds: f64,
    /// 提取文件总是从 0 开始
    pub first_sample_index: u64,
    pub created_at: NaiveDateTime,
}

impl DerivedFields {
    /// 为一次提取构建派生字段，创建时间取当前本地时间（截断到秒）
    pub fn for_extract(
        output_path: &Path,
        output_digest: impl Into<String>,
        output_size_bytes: u64,
        output_duration_seconds: f64,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            output_file_name: to_posix_string(output_path),
            output_digest: output_digest.into(),
            output_size_bytes,
            output_duration_seconds,
            first_sample_index: 0,
            created_at: now.with_nanosecond(0).unwrap_or(now),
        }
    }
}

type RewriteRule = fn(&DerivedFields) -> String;

fn create_time(d: &DerivedFields) -> String {
    d.created_at.format(CREATE_TIME_FORMAT).to_string()
}

fn file_name(d: &DerivedFields) -> String {
    d.output_file_name.clone()
}

fn file_sha1(d: &DerivedFields) -> String {
    d.output_digest.clone()
}

fn file_size_bytes(d: &DerivedFields) -> String {
    d.output_size_bytes.to_string()
}

fn file_time_secs(d: &DerivedFields) -> String {
    format_float(d.output_duration_seconds)
}

fn first_sample(d: &DerivedFields) -> String {
    d.first_sample_index.to_string()
}

/// 重写表：键 → 取值规则。不在表中的键原样透传。
const REWRITE_TABLE: &[(&str, RewriteRule)] = &[
    (meta_keys::FILE_CREATE_TIME, create_time),
    (meta_keys::FILE_NAME, file_name),
    (meta_keys::FILE_SHA1, file_sha1),
    (meta_keys::FILE_SIZE_BYTES, file_size_bytes),
    (meta_keys::FILE_TIME_SECS, file_time_secs),
    (meta_keys::FIRST_SAMPLE, first_sample),
];

/// 查找某一行对应的重写规则（要求行以 `key=` 开头）
fn rule_for_line(line: &str) -> Option<(&'static str, RewriteRule)> {
    REWRITE_TABLE.iter().copied().find(|&(key, _)| {
        line.strip_prefix(key)
            .is_some_and(|rest| rest.starts_with('='))
    })
}

/// 按重写表转换 `.meta` 文本
///
/// 输出行数恰好比输入多一行（提取标记）。
pub fn rewrite_meta_text(source: &str, derived: &DerivedFields) -> String {
    // 插入的换行沿用源文件的风格
    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let mut output = String::with_capacity(source.len() + 64);

    for line in source.split_inclusive('\n') {
        match rule_for_line(line) {
            Some((key, rule)) => {
                let body = line.trim_end_matches(['\r', '\n']);
                output.push_str(key);
                output.push('=');
                output.push_str(&rule(derived));
                output.push_str(&line[body.len()..]);
            }
            None => output.push_str(line),
        }
    }

    if !output.is_empty() && !output.ends_with('\n') {
        output.push_str(eol);
    }
    output.push_str(meta_keys::EXTRACTED_MARKER);
    output.push_str(eol);

    output
}

/// 读取原 `.meta` 并渲染提取版本的文本
pub fn render_extract_meta(meta_in: &Path, derived: &DerivedFields) -> ExtractResult<String> {
    let source = read_meta_text(meta_in)?;
    Ok(rewrite_meta_text(&source, derived))
}

/// 写出提取版本的 `.meta`（总是从头生成，不与已有文件合并）
pub fn write_extract_meta(
    meta_in: &Path,
    meta_out: &Path,
    derived: &DerivedFields,
) -> ExtractResult<()> {
    tracing::info!(from = %meta_in.display(), to = %meta_out.display(), "rewriting sidecar metadata");

    let text = render_extract_meta(meta_in, derived)?;

    if let Some(parent) = meta_out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error("创建目录 / create dir", parent, e))?;
    }

    std::fs::write(meta_out, text).map_err(|e| io_error("写入元数据 / write metadata", meta_out, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn derived() -> DerivedFields {
        DerivedFields {
            output_file_name: "out/ecephys/run_g0_t0.nidq.bin".to_string(),
            output_digest: "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709".to_string(),
            output_size_bytes: 80008,
            output_duration_seconds: 10.0,
            first_sample_index: 0,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 11)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap(),
        }
    }

    #[test]
    fn test_rewrites_table_keys_and_passes_others() {
        let source = "\
fileCreateTime=2024-01-01T00:00:00
fileName=D:\\raw\\run_g0_t0.nidq.bin
fileSHA1=0000
fileSizeBytes=123456789
fileTimeSecs=4938.27
firstSample=1234
customField=keepme
niSampRate=1000
";
        let expected = "\
fileCreateTime=2025-03-11T09:05:07
fileName=out/ecephys/run_g0_t0.nidq.bin
fileSHA1=DA39A3EE5E6B4B0D3255BFEF95601890AFD80709
fileSizeBytes=80008
fileTimeSecs=10.0
firstSample=0
customField=keepme
niSampRate=1000
~extracted=1
";
        assert_eq!(rewrite_meta_text(source, &derived()), expected);
    }

    #[test]
    fn test_output_has_exactly_one_more_line() {
        let source = "a=1\r\nfileSizeBytes=5\r\n~tag=(1,2)\r\nno_equals_line\r\n";
        let output = rewrite_meta_text(source, &derived());

        let in_lines: Vec<&str> = source.split_inclusive('\n').collect();
        let out_lines: Vec<&str> = output.split_inclusive('\n').collect();
        assert_eq!(out_lines.len(), in_lines.len() + 1);

        // 未重写的行逐字节一致（包括 CRLF）
        assert_eq!(out_lines[0], in_lines[0]);
        assert_eq!(out_lines[2], in_lines[2]);
        assert_eq!(out_lines[3], in_lines[3]);
        assert_eq!(out_lines[1], "fileSizeBytes=80008\r\n");
        assert_eq!(out_lines[4], "~extracted=1\r\n");
    }

    #[test]
    fn test_crlf_source_keeps_crlf_everywhere() {
        let source = "fileName=C:\\x.bin\r\ncustomField=keepme\r\nfirstSample=7";
        let output = rewrite_meta_text(source, &derived());
        assert_eq!(
            output,
            "fileName=out/ecephys/run_g0_t0.nidq.bin\r\ncustomField=keepme\r\nfirstSample=0\r\n~extracted=1\r\n"
        );
        assert_eq!(output.matches('\n').count(), output.matches("\r\n").count());
    }

    #[test]
    fn test_key_must_match_exactly() {
        // 前缀相同但键不同的行不能被重写
        let source = "fileNameExtra=x\nfileSizeBytesTotal=9\n fileName=indented\n";
        let output = rewrite_meta_text(source, &derived());
        assert_eq!(
            output,
            "fileNameExtra=x\nfileSizeBytesTotal=9\n fileName=indented\n~extracted=1\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline() {
        let output = rewrite_meta_text("a=1\nb=2", &derived());
        assert_eq!(output, "a=1\nb=2\n~extracted=1\n");
    }

    #[test]
    fn test_for_extract_uses_posix_path_and_zero_first_sample() {
        let d = DerivedFields::for_extract(Path::new("out/ecephys/x.bin"), "AB", 8, 1.5);
        assert_eq!(d.output_file_name, "out/ecephys/x.bin");
        assert_eq!(d.first_sample_index, 0);
        assert_eq!(d.created_at.nanosecond(), 0);
    }

    #[test]
    fn test_write_extract_meta_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let meta_in = dir.path().join("in.meta");
        let meta_out = dir.path().join("nested/deeper/out.meta");
        std::fs::write(&meta_in, "fileSizeBytes=1\ncustomField=keepme\n").unwrap();

        std::fs::create_dir_all(meta_out.parent().unwrap()).unwrap();
        std::fs::write(&meta_out, "stale=content\nmore=stale\nlines=here\n").unwrap();

        write_extract_meta(&meta_in, &meta_out, &derived()).unwrap();
        let text = std::fs::read_to_string(&meta_out).unwrap();
        assert_eq!(text, "fileSizeBytes=80008\ncustomField=keepme\n~extracted=1\n");
    }
}
