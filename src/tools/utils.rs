//! 工具函数模块
//!
//! 提供数值格式化、文件路径处理等通用工具函数。

/// 数值格式化工具函数
pub mod number {
    /// 浮点数的最短往返表示，整数值保留 `.0`（如 `10.0`、`10.5`）
    #[inline]
    pub fn format_float(value: f64) -> String {
        format!("{value:?}")
    }
}

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 获取父目录，如果不存在则返回当前目录
    #[inline]
    pub fn get_parent_dir(path: &Path) -> &Path {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// 正斜杠分隔的路径字符串（`.meta` 中的 `fileName`）
    #[inline]
    pub fn to_posix_string(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

// 重新导出为平级函数
pub use number::format_float;
pub use path::{extract_filename_lossy, get_parent_dir, to_posix_string};
