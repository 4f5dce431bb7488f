//! 工具模块集合
//!
//! 包含CLI、路径定位、任务处理、汇总输出等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod locator;
pub mod logging;
pub mod processor;
pub mod report;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{
    AppConfig, JobConfig, build_command, config_from_matches, load_job_config,
    show_completion_info, show_startup_info,
};
pub use locator::{InputPaths, LocateConfig, locate_input_paths, locate_unique};
pub use logging::init_logging;
pub use processor::{JobOutcome, process_job};
pub use report::{format_summary_table, show_summary, write_summary_json};
