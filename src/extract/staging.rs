//! 暂存文件
//!
//! 输出先写到目标目录下的临时文件，全部步骤成功后再原子重命名到最终路径。
//! 未提交的暂存文件在 drop 时自动删除，最终路径上不会出现半成品。

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{ExtractError, ExtractResult, io_error};
use crate::tools::utils;

/// 尚未提交的输出文件
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    final_path: PathBuf,
}

impl StagedFile {
    /// 在 `final_path` 所在目录创建暂存文件（必要时创建目录）
    pub fn create(final_path: &Path) -> ExtractResult<Self> {
        let parent = ensure_parent_dir(final_path)?;
        let prefix = format!(".{}.", utils::extract_filename_lossy(final_path));

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".partial")
            .tempfile_in(&parent)
            .map_err(|e| io_error("创建暂存文件 / create staging file in", &parent, e))?;

        tracing::debug!(staging = %temp.path().display(), target = %final_path.display(), "staging output");

        Ok(Self {
            temp,
            final_path: final_path.to_path_buf(),
        })
    }

    /// 暂存并写入完整文本
    pub fn with_text(final_path: &Path, text: &str) -> ExtractResult<Self> {
        let mut staged = Self::create(final_path)?;
        let path = staged.path().to_path_buf();
        let file = staged.temp.as_file_mut();
        file.write_all(text.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error("写入暂存文件 / write staging file", &path, e))?;
        Ok(staged)
    }

    /// 暂存文件当前路径
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// 提交后的最终路径
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    pub(crate) fn file(&self) -> &File {
        self.temp.as_file()
    }

    /// 原子重命名到最终路径
    pub fn commit(self) -> ExtractResult<PathBuf> {
        let final_path = self.final_path;
        self.temp.persist(&final_path).map_err(|e| ExtractError::Io {
            context: format!("提交输出 / commit output {}", final_path.display()),
            source: e.error,
        })?;

        tracing::debug!(path = %final_path.display(), "committed output");
        Ok(final_path)
    }
}

/// 确保父目录存在（幂等），返回父目录
pub fn ensure_parent_dir(path: &Path) -> ExtractResult<PathBuf> {
    let parent = utils::get_parent_dir(path).to_path_buf();
    std::fs::create_dir_all(&parent).map_err(|e| io_error("创建目录 / create dir", &parent, e))?;
    Ok(parent)
}
