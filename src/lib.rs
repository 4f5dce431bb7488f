//! minimal-ecephys：SpikeGLX 录制文件最小数据集裁剪工具
//!
//! 围绕若干试次事件截取一段短时间窗口，生成格式有效、体积很小的录制文件和
//! 配套 `.meta`，便于下游处理流程频繁测试。
//!
//! ## 核心特性
//! - `.meta` 键值解析（整数 → 浮点 → 字符串类型推断，保持原始顺序）
//! - 事件索引 + 填充时长 → 时间范围 → 两端包含的整数样本窗口
//! - 内存映射窗口拷贝：多GB录制文件不整读进内存
//! - 流式 SHA-1 摘要，重写 `.meta` 并追加提取标记
//! - 暂存 + 原子重命名：失败时最终路径上不会留下半成品

pub mod behavior;
pub mod error;
pub mod extract;
pub mod meta;
pub mod tools;
pub mod window;

// 重新导出核心类型
pub use behavior::{TrialRange, extract_behavior_events};
pub use error::{ErrorCategory, ExtractError, ExtractResult};
pub use extract::{ExtractionResult, compute_sha1, extract_bin, extract_window};
pub use meta::{DerivedFields, MetaValue, MetadataRecord, parse_meta, write_extract_meta};
pub use window::{SampleWindow, TimeRange, calculate_sample_window, resolve_time_range};
