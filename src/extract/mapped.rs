//! 内存映射视图
//!
//! 源文件只读映射，按 `(总样本数, 通道数)` 的行布局访问；目标文件是预先定长的
//! 可写映射，拷贝完成后显式刷盘并释放映射，之后才允许其他步骤读取同一路径。
//! 两种视图都随作用域释放，中途出错不会留下悬挂的映射区域。

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};

use super::staging::StagedFile;
use crate::error::{ExtractError, ExtractResult, io_error, range_error};
use crate::tools::constants::sample_format::SAMPLE_WIDTH_BYTES;

/// 源二进制文件的只读映射
#[derive(Debug)]
pub struct SourceView {
    path: PathBuf,
    mmap: Mmap,
    channel_count: usize,
}

impl SourceView {
    /// 以只读方式映射源文件，并检查文件至少包含 `required_bytes` 字节
    ///
    /// # 错误
    ///
    /// * `ExtractError::Io` - 打开或映射失败
    /// * `ExtractError::Range` - 文件长度不足
    pub fn open(path: &Path, channel_count: usize, required_bytes: u64) -> ExtractResult<Self> {
        if channel_count == 0 {
            return Err(ExtractError::InvalidInput(
                "通道数必须为正 / channel count must be positive".to_string(),
            ));
        }

        let file = File::open(path).map_err(|e| io_error("打开源文件 / open source", path, e))?;
        let file_len = file
            .metadata()
            .map_err(|e| io_error("读取文件信息 / stat source", path, e))?
            .len();

        if file_len < required_bytes {
            return Err(range_error(
                path,
                format!(
                    "需要至少 {required_bytes} 字节，实际 {file_len} 字节 / need at least {required_bytes} bytes, file has {file_len}"
                ),
            ));
        }

        let row_bytes = (channel_count * SAMPLE_WIDTH_BYTES) as u64;
        if file_len % row_bytes != 0 {
            tracing::warn!(
                path = %path.display(),
                file_len,
                row_bytes,
                "source length is not a whole number of rows; trailing bytes ignored"
            );
        }

        // SAFETY: 映射只读，源文件在提取期间不被本进程修改
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .map_err(|e| io_error("映射源文件 / map source", path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            channel_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    fn row_bytes(&self) -> usize {
        self.channel_count * SAMPLE_WIDTH_BYTES
    }

    /// 完整行数（末尾不足一行的字节不计）
    pub fn total_rows(&self) -> u64 {
        (self.mmap.len() / self.row_bytes()) as u64
    }

    /// 行区间 `[start_row, start_row + row_count)` 的原始字节
    pub fn rows(&self, start_row: u64, row_count: u64) -> ExtractResult<&[u8]> {
        let row_bytes = self.row_bytes() as u64;
        let total = self.total_rows();
        let span = start_row
            .checked_add(row_count)
            .filter(|&end| end <= total)
            .map(|end| (start_row * row_bytes, end * row_bytes));

        match span {
            Some((begin, end)) => Ok(&self.mmap[begin as usize..end as usize]),
            None => Err(range_error(
                &self.path,
                format!("行 {start_row}+{row_count} 超出 {total} 行 / rows exceed {total} total rows"),
            )),
        }
    }

    /// 读取单个样本（小端 int16）
    pub fn sample(&self, row: u64, channel: usize) -> Option<i16> {
        if channel >= self.channel_count || row >= self.total_rows() {
            return None;
        }
        let offset = row as usize * self.row_bytes() + channel * SAMPLE_WIDTH_BYTES;
        let bytes = self.mmap.get(offset..offset + SAMPLE_WIDTH_BYTES)?;
        Some(i16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

/// 目标文件的可写映射（位于暂存文件上）
#[derive(Debug)]
pub struct DestinationView {
    staged: StagedFile,
    mmap: MmapMut,
}

impl DestinationView {
    /// 创建暂存文件，预设为 `byte_len` 字节并可写映射
    pub fn create(final_path: &Path, byte_len: u64) -> ExtractResult<Self> {
        let staged = StagedFile::create(final_path)?;
        let staging_path = staged.path().to_path_buf();

        if usize::try_from(byte_len).is_err() {
            return Err(range_error(
                final_path,
                format!("输出 {byte_len} 字节超出可映射范围 / output too large to map"),
            ));
        }

        staged
            .file()
            .set_len(byte_len)
            .map_err(|e| io_error("预设输出长度 / size output", &staging_path, e))?;

        // SAFETY: 暂存文件由本视图独占，映射释放前没有其他读写者
        let mmap = unsafe { MmapMut::map_mut(staged.file()) }
            .map_err(|e| io_error("映射输出文件 / map output", &staging_path, e))?;

        Ok(Self { staged, mmap })
    }

    /// 一次性拷贝整段字节；长度必须与输出完全一致
    pub fn copy_from(&mut self, bytes: &[u8]) -> ExtractResult<()> {
        if bytes.len() != self.mmap.len() {
            return Err(range_error(
                self.staged.final_path(),
                format!(
                    "拷贝长度 {} 与输出长度 {} 不符 / copy length mismatch",
                    bytes.len(),
                    self.mmap.len()
                ),
            ));
        }
        self.mmap.copy_from_slice(bytes);
        Ok(())
    }

    /// 刷盘并释放映射，交出暂存文件
    pub fn finish(self) -> ExtractResult<StagedFile> {
        let Self { staged, mmap } = self;
        mmap.flush()
            .map_err(|e| io_error("刷写输出 / flush output", staged.path(), e))?;
        drop(mmap);
        Ok(staged)
    }
}
