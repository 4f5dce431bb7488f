//! minimal-ecephys - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成裁剪任务。

use minimal_ecephys::{
    error::{ErrorCategory, ExtractError},
    tools::{self, AppConfig},
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误（I/O）
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/格式错误
    pub const FORMAT_ERROR: i32 = 2;
    /// 窗口或索引越界
    pub const RANGE_ERROR: i32 = 3;
    /// 输入路径无法唯一定位
    pub const LOCATE_ERROR: i32 = 4;
}

/// 获取错误建议文本
fn get_error_suggestion(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Input => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check command-line arguments, use --help to see full usage"
        }
        ErrorCategory::Format => {
            "检查 .meta 是否包含 niSampRate/imSampRate 和 nSavedChans / Check the .meta has niSampRate/imSampRate and nSavedChans"
        }
        ErrorCategory::Range => {
            "缩小事件范围或填充时长 / Narrow the event range or padding"
        }
        ErrorCategory::Io => {
            "检查文件路径是否正确，文件是否存在且可读写 / Check paths exist and are readable/writable"
        }
        ErrorCategory::Locate => {
            "收紧glob模式使其只匹配一个文件，或直接给出路径 / Tighten the glob pattern to match one file, or pass the path explicitly"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: ExtractError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    if let Some(source) = std::error::Error::source(&error) {
        eprintln!("        原因 / Cause: {source}");
    }

    let category = ErrorCategory::from_extract_error(&error);
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));

    let exit_code = match category {
        ErrorCategory::Input | ErrorCategory::Format => exit_codes::FORMAT_ERROR,
        ErrorCategory::Range => exit_codes::RANGE_ERROR,
        ErrorCategory::Locate => exit_codes::LOCATE_ERROR,
        ErrorCategory::Io => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 执行任务并输出汇总
fn process(config: &AppConfig) -> Result<(), ExtractError> {
    let outcome = tools::process_job(config)?;

    tools::show_summary(&outcome);

    if let Some(summary_path) = &config.summary_path {
        tools::write_summary_json(summary_path, &outcome)?;
        println!("📄 摘要 / summary: {}", summary_path.display());
    }

    Ok(())
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), ExtractError> {
    // 1. 解析命令行参数（先初始化日志，任务文件中的路径定位也会记录）
    let matches = tools::build_command().get_matches();
    tools::init_logging(matches.get_flag("verbose"));
    let config = tools::config_from_matches(&matches)?;

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 执行
    process(&config)?;

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
