//! 时间范围与样本窗口

pub mod events;
pub mod sample_window;

pub use events::{TimeRange, parse_event_times, read_event_times, resolve_time_range};
pub use sample_window::{SampleWindow, calculate_sample_window, sample_window_for};
