//! 完整性摘要
//!
//! 按固定块大小流式读取文件，增量计算 SHA-1，输出大写十六进制。
//! 与 `.meta` 中的 `fileSHA1` 字段格式一致。结果与块大小无关。

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::error::{ExtractError, ExtractResult, io_error};

/// 流式计算文件 SHA-1
pub fn compute_sha1(path: &Path, chunk_size: usize) -> ExtractResult<String> {
    if chunk_size == 0 {
        return Err(ExtractError::InvalidInput(
            "摘要块大小必须为正 / digest chunk size must be positive".to_string(),
        ));
    }

    let mut file = File::open(path).map_err(|e| io_error("打开摘要文件 / open for digest", path, e))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; chunk_size];

    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_error("读取摘要文件 / read for digest", path, e)),
        }
    }

    let digest = format!("{:X}", hasher.finalize());
    tracing::debug!(path = %path.display(), %digest, "computed sha1");
    Ok(digest)
}

/// 对内存中的字节一次性计算 SHA-1（大写十六进制）
pub fn sha1_hex(bytes: &[u8]) -> String {
    format!("{:X}", Sha1::digest(bytes))
}
