//! 日志初始化
//!
//! 诊断信息走 `tracing`，输出到 stderr；`RUST_LOG` 优先，否则按 `--verbose` 选择级别。

use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅者（重复调用静默忽略）
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
