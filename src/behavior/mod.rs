//! 行为数据辅助处理
//!
//! 与录制文件配套的行为日志按同一试次范围裁剪。

pub mod trial_log;

pub use trial_log::{TrialRange, extract_behavior_events, filter_trial_lines};
