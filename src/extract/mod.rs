//! 二进制提取模块
//!
//! 内存映射窗口拷贝、暂存提交、流式摘要，以及把它们串起来的提取流程。

pub mod binary;
pub mod digest;
pub mod mapped;
pub mod pipeline;
pub mod staging;

pub use binary::extract_window;
pub use digest::{compute_sha1, sha1_hex};
pub use mapped::{DestinationView, SourceView};
pub use pipeline::{ExtractionResult, extract_bin, meta_path_for};
pub use staging::StagedFile;
