//! 统一错误处理框架
//!
//! 提取流水线的核心错误类型定义。任何错误都会立即中止当前提取，
//! 错误信息中携带文件路径、请求窗口或索引，便于定位问题。

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 提取流水线相关的统一错误类型
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 元数据文件格式错误或内容不可解析
    #[error("解析失败 / parse failed: {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// 缺少必需的元数据字段（采样率、通道数）
    #[error("缺少字段 / missing field `{field}` in {}", path.display())]
    MissingField { path: PathBuf, field: String },

    /// 事件索引越界
    #[error("事件索引越界 / event index {index} out of bounds for {len} events")]
    Index { index: usize, len: usize },

    /// 请求的样本窗口超出源文件范围
    #[error("样本窗口越界 / sample window out of range for {}: {reason}", path.display())]
    Range { path: PathBuf, reason: String },

    /// 文件I/O错误（读、写、创建目录、重命名）
    #[error("文件I/O错误 / I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// 参数验证错误
    #[error("输入验证失败 / invalid input: {0}")]
    InvalidInput(String),

    /// 路径定位失败（零个或多个候选）
    #[error(
        "路径定位失败 / pattern `{pattern}` under {} matched {matches} files, expected exactly 1",
        root.display()
    )]
    Locate {
        pattern: String,
        root: PathBuf,
        matches: usize,
    },
}

/// 提取操作的标准Result类型
pub type ExtractResult<T> = Result<T, ExtractError>;

// ==================== 错误转换Helper函数 ====================
// 消除重复的 .map_err(|e| ExtractError::Xxx { ... }) 模式

/// 创建带路径上下文的I/O错误
#[inline]
pub fn io_error(context: impl AsRef<str>, path: &Path, source: io::Error) -> ExtractError {
    ExtractError::Io {
        context: format!("{} {}", context.as_ref(), path.display()),
        source,
    }
}

/// 创建解析错误
#[inline]
pub fn parse_error(path: &Path, reason: impl Into<String>) -> ExtractError {
    ExtractError::Parse {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// 创建范围错误
#[inline]
pub fn range_error(path: &Path, reason: impl Into<String>) -> ExtractError {
    ExtractError::Range {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

// ==================== 错误分类系统 ====================
// 用于CLI退出码和建议文本

/// 错误类别枚举
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 元数据/事件文件内容问题
    Format,
    /// 请求窗口或索引越界
    Range,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 输入路径无法唯一定位
    Locate,
    /// 参数错误
    Input,
}

impl ErrorCategory {
    /// 从ExtractError提取错误类别
    pub fn from_extract_error(e: &ExtractError) -> Self {
        match e {
            ExtractError::Parse { .. } | ExtractError::MissingField { .. } => Self::Format,
            ExtractError::Index { .. } | ExtractError::Range { .. } => Self::Range,
            ExtractError::Io { .. } => Self::Io,
            ExtractError::Locate { .. } => Self::Locate,
            ExtractError::InvalidInput(_) => Self::Input,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误 / format",
            Self::Range => "范围错误 / range",
            Self::Io => "I/O错误 / I/O",
            Self::Locate => "定位错误 / locate",
            Self::Input => "参数错误 / input",
        }
    }
}
